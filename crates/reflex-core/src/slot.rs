//! Stored property content and strict equality

use crate::observer::NodeRef;
use crate::{Error, Result, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// What a property holds
///
/// Equality between slots is strict rather than deep: detached values compare
/// by content, nodes and plain composites by identity.
#[derive(Clone)]
pub enum Slot {
    /// A detached value: a leaf, or a copy read out of a plain composite
    Value(Value),
    /// A wrapped, reactive subtree
    Node(NodeRef),
    /// A composite assigned after wrapping; shared and mutable but untracked
    Plain(PlainRef),
}

impl Slot {
    /// Strict equality
    pub fn same(&self, other: &Slot) -> bool {
        match (self, other) {
            (Slot::Value(a), Slot::Value(b)) => a == b,
            (Slot::Node(a), Slot::Node(b)) => Rc::ptr_eq(a, b),
            (Slot::Plain(a), Slot::Plain(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Deep copy into a plain value
    pub fn to_value(&self) -> Value {
        match self {
            Slot::Value(v) => v.clone(),
            Slot::Node(node) => node.to_value(),
            Slot::Plain(plain) => plain.get(),
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Slot::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_plain(&self) -> Option<&PlainRef> {
        match self {
            Slot::Plain(plain) => Some(plain),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether reads below this slot are tracked
    pub fn is_reactive(&self) -> bool {
        matches!(self, Slot::Node(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Value(v) => v.type_name(),
            Slot::Node(_) => "node",
            Slot::Plain(_) => "plain",
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Slot::Node(node) => f.debug_tuple("Node").field(&node.to_value()).finish(),
            Slot::Plain(plain) => f.debug_tuple("Plain").field(&plain.get()).finish(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Composites are stored as-is, never wrapped; see [`observe`](crate::observe)
/// for building a reactive subtree instead.
impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        if value.is_composite() {
            Slot::Plain(PlainRef::new(value))
        } else {
            Slot::Value(value)
        }
    }
}

impl From<NodeRef> for Slot {
    fn from(node: NodeRef) -> Self {
        Slot::Node(node)
    }
}

impl From<PlainRef> for Slot {
    fn from(plain: PlainRef) -> Self {
        Slot::Plain(plain)
    }
}

macro_rules! slot_from_leaf {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Slot {
                fn from(v: $t) -> Self {
                    Slot::Value(Value::from(v))
                }
            }
        )*
    };
}

slot_from_leaf!(bool, i64, i32, f64, String, &str);

/// Shared handle to an untracked composite value
#[derive(Debug, Clone)]
pub struct PlainRef(Rc<RefCell<Value>>);

impl PlainRef {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Copy of the current value
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &PlainRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Read a value below this composite
    pub fn read(&self, segments: &[String]) -> Option<Value> {
        let root = self.0.borrow();
        let mut current: &Value = &root;
        for seg in segments {
            current = current.child(seg)?;
        }
        Some(current.clone())
    }

    /// Write a value below this composite
    ///
    /// Intermediate segments must exist. The last segment may add a new key to
    /// a map; list indices must already exist. Returns whether the stored
    /// value changed.
    pub fn write(&self, segments: &[String], value: Value) -> Result<bool> {
        let Some((last, parents)) = segments.split_last() else {
            let mut root = self.0.borrow_mut();
            let changed = *root != value;
            *root = value;
            return Ok(changed);
        };
        let mut root = self.0.borrow_mut();
        let mut current: &mut Value = &mut root;
        for seg in parents {
            current = current
                .child_mut(seg)
                .ok_or_else(|| Error::PropertyNotFound(seg.clone()))?;
        }
        match current {
            Value::Map(map) => {
                let changed = map.get(last) != Some(&value);
                map.insert(last.clone(), value);
                Ok(changed)
            }
            Value::List(list) => {
                let item = last
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| list.get_mut(i))
                    .ok_or_else(|| Error::PropertyNotFound(last.clone()))?;
                let changed = *item != value;
                *item = value;
                Ok(changed)
            }
            other => Err(Error::NotAnObject {
                path: last.clone(),
                got: other.type_name().to_string(),
            }),
        }
    }
}
