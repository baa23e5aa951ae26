//! Dotted property paths and path resolution over slots

use crate::dependency::NotifyReport;
use crate::{Error, Result, Slot};
use std::fmt;

/// A property path such as `user.name`
///
/// List entries are addressed by index (`tags.0`). The empty path names the
/// root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a dotted path
    pub fn new(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self {
            segments: path.split('.').map(String::from).collect(),
        }
    }

    /// Path of a single top-level key, taken verbatim
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Dotted form of the first `n` segments, for error messages
    fn prefix(&self, n: usize) -> String {
        self.segments[..n].join(".")
    }

    /// Tracked read of the slot at this path
    ///
    /// Every wrapped property on the way is a tracked read; below a plain
    /// composite the walk continues untracked.
    pub fn read(&self, root: &Slot) -> Result<Slot> {
        let mut current = root.clone();
        for (i, seg) in self.segments.iter().enumerate() {
            current = match current {
                Slot::Node(node) => node
                    .get(seg)
                    .map_err(|_| Error::PropertyNotFound(self.prefix(i + 1)))?,
                Slot::Plain(plain) => {
                    let value = plain
                        .read(&self.segments[i..])
                        .ok_or_else(|| Error::PropertyNotFound(self.to_string()))?;
                    return Ok(Slot::Value(value));
                }
                Slot::Value(value) => match value.child(seg) {
                    Some(child) => Slot::Value(child.clone()),
                    None if value.is_composite() => {
                        return Err(Error::PropertyNotFound(self.prefix(i + 1)));
                    }
                    None => {
                        return Err(Error::NotAnObject {
                            path: self.prefix(i),
                            got: value.type_name().to_string(),
                        });
                    }
                },
            };
        }
        Ok(current)
    }

    /// Write `value` at this path
    ///
    /// The final property must be a wrapped property or live inside a plain
    /// composite; detached copies cannot be written through.
    pub fn write(&self, root: &Slot, value: Slot) -> Result<NotifyReport> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Err(Error::PropertyNotFound(String::new()));
        };
        let mut current = root.clone();
        for (i, seg) in parents.iter().enumerate() {
            current = match current {
                Slot::Node(node) => node
                    .get(seg)
                    .map_err(|_| Error::PropertyNotFound(self.prefix(i + 1)))?,
                Slot::Plain(plain) => {
                    let changed = plain.write(&self.segments[i..], value.to_value())?;
                    return Ok(NotifyReport::untracked(changed));
                }
                Slot::Value(v) => {
                    return Err(Error::NotAnObject {
                        path: self.prefix(i),
                        got: v.type_name().to_string(),
                    });
                }
            };
        }
        match current {
            Slot::Node(node) => node
                .set(last, value)
                .map_err(|_| Error::PropertyNotFound(self.to_string())),
            Slot::Plain(plain) => {
                let changed = plain.write(std::slice::from_ref(last), value.to_value())?;
                Ok(NotifyReport::untracked(changed))
            }
            Slot::Value(v) => Err(Error::NotAnObject {
                path: self.prefix(parents.len()),
                got: v.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&Path> for Path {
    fn from(p: &Path) -> Self {
        p.clone()
    }
}
