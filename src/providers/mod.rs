//! Remote collaborators: parameter store, queue, record store, notifier.

#[cfg(feature = "aws")]
pub mod aws;
pub mod traits;

pub use traits::{MessageQueue, Notifier, ParameterSource, RecordStore};
