//! Public types for the Huginn API.

mod message;
mod parameter;
mod record;

pub use message::{LOGIN_MESSAGE_TYPE, Message, QueueMessage};
pub use parameter::Parameter;
pub use record::{SortKeyClock, StoredRecord};
