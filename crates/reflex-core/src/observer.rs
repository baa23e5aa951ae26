//! Reactive view over a plain property tree
//!
//! [`observe`] walks a [`Value`] once, depth-first, and turns every map and
//! list into a [`Node`] whose entries are tracked [`Property`] slots, each
//! owning one [`Dependency`]. Reading a property while a subscriber is
//! evaluating registers that subscriber; writing a different value notifies
//! everything registered.
//!
//! # Tracking boundary
//!
//! - The key set of a node is fixed when it is wrapped. Writing an unknown key
//!   is [`Error::PropertyNotFound`]; to track new keys assign a freshly
//!   observed subtree.
//! - Assigning a composite [`Value`] stores it as [`Slot::Plain`]. Its own
//!   entries are not wrapped, so writes beneath it notify nobody.

use crate::dependency::{Dependency, NotifyReport};
use crate::{tracking, Error, Result, Slot, Value, ValueMap};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a wrapped node
pub type NodeRef = Rc<Node>;

/// Shape of the value a node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Map,
    List,
}

/// Build the reactive view of `value`
///
/// Maps and lists become [`Slot::Node`]; any other value is returned
/// unchanged as [`Slot::Value`].
pub fn observe(value: Value) -> Slot {
    match value {
        Value::Map(map) => Slot::Node(Rc::new(Node::wrap(NodeKind::Map, map))),
        Value::List(list) => {
            let entries = list
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v));
            Slot::Node(Rc::new(Node::wrap(NodeKind::List, entries)))
        }
        other => Slot::Value(other),
    }
}

/// A tracked, named slot on a node
pub struct Property {
    key: String,
    slot: RefCell<Slot>,
    dep: Dependency,
}

impl Property {
    fn new(key: String, slot: Slot) -> Self {
        Self {
            key,
            slot: RefCell::new(slot),
            dep: Dependency::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dep
    }

    /// Tracked read
    pub fn get(&self) -> Slot {
        if let Some(watcher) = tracking::current() {
            self.dep.add_sub(&watcher);
        }
        self.slot.borrow().clone()
    }

    /// Read without registering anyone
    pub fn peek(&self) -> Slot {
        self.slot.borrow().clone()
    }

    /// Store `value` and notify if it differs from the current one
    pub fn set(&self, value: Slot) -> NotifyReport {
        if self.slot.borrow().same(&value) {
            return NotifyReport::unchanged();
        }
        tracing::trace!(key = %self.key, value = %value, "property write");
        self.slot.replace(value);
        self.dep.notify()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("slot", &self.slot.borrow())
            .field("dep", &self.dep)
            .finish()
    }
}

/// A wrapped map or list
pub struct Node {
    kind: NodeKind,
    props: IndexMap<String, Property>,
}

impl Node {
    fn wrap(kind: NodeKind, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let props = entries
            .into_iter()
            .map(|(key, value)| {
                // Children are wrapped before their parent property exists.
                let slot = observe(value);
                (key.clone(), Property::new(key, slot))
            })
            .collect();
        Self { kind, props }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.props.get(key)
    }

    /// Tracked read of a direct child
    pub fn get(&self, key: &str) -> Result<Slot> {
        self.property(key)
            .map(Property::get)
            .ok_or_else(|| Error::PropertyNotFound(key.to_string()))
    }

    /// Write a direct child
    pub fn set(&self, key: &str, value: impl Into<Slot>) -> Result<NotifyReport> {
        let prop = self
            .property(key)
            .ok_or_else(|| Error::PropertyNotFound(key.to_string()))?;
        Ok(prop.set(value.into()))
    }

    /// Keys in wrap order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Untracked deep copy of the current contents
    pub fn to_value(&self) -> Value {
        let values = self.props.values().map(|p| p.peek().to_value());
        match self.kind {
            NodeKind::Map => {
                let map: ValueMap = self.props.keys().cloned().zip(values).collect();
                Value::Map(map)
            }
            NodeKind::List => Value::List(values.collect()),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("props", &self.props)
            .finish()
    }
}
