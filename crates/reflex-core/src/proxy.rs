//! Root-level accessors forwarding to `$data`
//!
//! `vm.get("key")` is `vm.data().key` and `vm.set("key", v)` is
//! `vm.data().key = v`. Nothing here tracks on its own: the forwarded read or
//! write lands on the wrapped property, which does the tracking.

use crate::dependency::NotifyReport;
use crate::{Error, Path, Result, Slot, ViewModel};

impl ViewModel {
    /// Keys exposed at root level, in data order
    pub fn proxy_keys(&self) -> impl Iterator<Item = &str> {
        self.proxied().iter().map(String::as_str)
    }

    /// Forwarded read of a top-level key
    pub fn get(&self, key: &str) -> Result<Slot> {
        self.proxied_path(key)?.read(self.data())
    }

    /// Forwarded write of a top-level key
    pub fn set(&self, key: &str, value: impl Into<Slot>) -> Result<NotifyReport> {
        self.proxied_path(key)?.write(self.data(), value.into())
    }

    fn proxied_path(&self, key: &str) -> Result<Path> {
        if self.proxied().iter().any(|k| k == key) {
            Ok(Path::key(key))
        } else {
            Err(Error::PropertyNotFound(key.to_string()))
        }
    }
}
