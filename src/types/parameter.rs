//! Remote configuration parameter values

use serde::{Deserialize, Serialize};

/// A parameter as returned by the remote configuration store.
///
/// The pipeline only ever reads `value`; the rest is carried along for
/// logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name the parameter was requested under.
    pub name: String,
    /// Current value.
    pub value: String,
    /// Store-side version, when the store reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            version: None,
        }
    }

    /// Attach a store-side version.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }
}
