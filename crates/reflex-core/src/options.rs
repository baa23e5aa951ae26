//! Root construction options

use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Options accepted by [`ViewModel::new`](crate::ViewModel::new)
///
/// `el` is handed through to the presentation layer untouched apart from a
/// sanity check; only `data` is consumed here.
///
/// # Example
///
/// ```
/// use reflex_core::Options;
///
/// let options = Options::from_ron(r##"(el: Some("#app"), data: { "count": 0 })"##).unwrap();
/// assert_eq!(options.el.as_deref(), Some("#app"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Selector for the root element
    #[serde(default)]
    pub el: Option<String>,
    /// The property tree to make reactive
    #[serde(default)]
    pub data: Value,
}

impl Options {
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            el: None,
            data: data.into(),
        }
    }

    pub fn with_el(mut self, el: impl Into<String>) -> Self {
        self.el = Some(el.into());
        self
    }

    /// Parse options from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject selectors that cannot match any element
    pub fn validate(&self) -> Result<()> {
        let Some(el) = &self.el else {
            return Ok(());
        };
        let trimmed = el.trim();
        if trimmed.is_empty() || matches!(trimmed, "#" | ".") {
            return Err(Error::InvalidRoot(el.clone()));
        }
        Ok(())
    }
}
