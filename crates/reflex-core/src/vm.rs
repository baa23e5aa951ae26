//! The root object: options in, reactive `$data` out

use crate::dependency::NotifyReport;
use crate::{observe, Options, Path, Result, Slot, Value};
use std::rc::Rc;

struct VmInner {
    el: Option<String>,
    /// `$data`: the wrapped tree
    data: Slot,
    /// Top-level keys exposed through the accessor proxy
    proxied: Vec<String>,
}

/// A reactive root
///
/// Cloning yields another handle to the same root, which is how
/// [`Subscriber`](crate::Subscriber)s keep hold of it.
///
/// # Example
///
/// ```
/// use reflex_core::{Options, Value, ViewModel};
///
/// let data: Value = [("count", 0i64)].into_iter().collect();
/// let vm = ViewModel::new(Options::new(data)).unwrap();
/// vm.set("count", 1i64).unwrap();
/// assert_eq!(vm.get("count").unwrap().to_value(), Value::Int(1));
/// ```
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<VmInner>,
}

impl ViewModel {
    /// Validate the options and build the reactive view of `data`
    ///
    /// Data that is not a map or list is kept as-is and exposes no proxied
    /// keys.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        let Options { el, data } = options;
        let proxied = match &data {
            Value::Map(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        let data = observe(data);
        tracing::debug!(keys = proxied.len(), el = ?el, "root constructed");
        Ok(Self {
            inner: Rc::new(VmInner { el, data, proxied }),
        })
    }

    /// Root element selector
    pub fn el(&self) -> Option<&str> {
        self.inner.el.as_deref()
    }

    /// `$data`
    pub fn data(&self) -> &Slot {
        &self.inner.data
    }

    pub(crate) fn proxied(&self) -> &[String] {
        &self.inner.proxied
    }

    /// Read at a dotted path below `$data` (tracked)
    pub fn get_path(&self, path: impl Into<Path>) -> Result<Slot> {
        path.into().read(self.data())
    }

    /// Write at a dotted path below `$data`
    pub fn set_path(&self, path: impl Into<Path>, value: impl Into<Slot>) -> Result<NotifyReport> {
        path.into().write(self.data(), value.into())
    }

    /// Untracked deep copy of `$data`
    pub fn snapshot(&self) -> Value {
        self.data().to_value()
    }

    /// Whether two handles refer to the same root
    pub fn ptr_eq(&self, other: &ViewModel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModel")
            .field("el", &self.inner.el)
            .field("data", &self.inner.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn options() -> Options {
        Options::new(
            [
                ("count", Value::Int(0)),
                ("user", [("name", "a")].into_iter().collect()),
            ]
            .into_iter()
            .collect::<Value>(),
        )
        .with_el("#app")
    }

    #[test]
    fn test_new_wraps_data() {
        let vm = ViewModel::new(options()).unwrap();
        assert_eq!(vm.el(), Some("#app"));
        assert!(vm.data().is_reactive());
        assert_eq!(vm.snapshot(), options().data);
    }

    #[test]
    fn test_invalid_root_is_reported() {
        let err = ViewModel::new(options().with_el("")).unwrap_err();
        assert_eq!(err, Error::InvalidRoot(String::new()));
    }

    #[test]
    fn test_non_object_data_is_kept() {
        let vm = ViewModel::new(Options::new(5i64)).unwrap();
        assert!(!vm.data().is_reactive());
        assert_eq!(vm.snapshot(), Value::Int(5));
        assert!(vm.proxied().is_empty());
    }

    #[test]
    fn test_paths() {
        let vm = ViewModel::new(options()).unwrap();
        let report = vm.set_path("user.name", "b").unwrap();
        assert!(report.changed);
        assert_eq!(vm.get_path("user.name").unwrap().to_value(), Value::from("b"));
    }

    #[test]
    fn test_clone_shares_root() {
        let vm = ViewModel::new(options()).unwrap();
        let other = vm.clone();
        assert!(vm.ptr_eq(&other));
        other.set_path("count", 3i64).unwrap();
        assert_eq!(vm.get_path("count").unwrap().to_value(), Value::Int(3));
    }
}
