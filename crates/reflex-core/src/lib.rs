//! Reflex Core - Reactive property trees with read-time dependency tracking
//!
//! This crate turns a plain property tree into one where reads are observed and
//! writes notify interested consumers:
//! - Plain value types (`Value`, `ValueMap`)
//! - The reactive view built by `observe` (`Node`, `Property`, `Slot`)
//! - Per-property subscriber lists (`Dependency`)
//! - Consumers that discover their dependencies by reading (`Subscriber`)
//! - A root object with root-level accessors (`ViewModel`, `Options`)
//!
//! ## How tracking works
//!
//! A `Subscriber` pushes itself onto a thread-local tracking stack, reads its
//! path, and pops itself off again. Every wrapped property read in between
//! adds the subscriber to its `Dependency`. A later write that changes the
//! property notifies each registered subscriber, in registration order, and
//! each one re-reads its path and calls its callback if the value changed.
//!
//! Everything is single-threaded and synchronous: a write returns only after
//! every notified callback has run.
//!
//! ```
//! use reflex_core::{Options, Subscriber, Value, ViewModel};
//!
//! let options = Options::from_ron(r#"(data: { "count": 0 })"#).unwrap();
//! let vm = ViewModel::new(options).unwrap();
//! let sub = Subscriber::new(&vm, "count", |v| {
//!     assert_eq!(v.to_value(), Value::Int(1));
//!     Ok(())
//! })
//! .unwrap();
//!
//! let report = vm.set("count", 1i64).unwrap();
//! assert_eq!(report.delivered, 1);
//! # drop(sub);
//! ```

pub mod dependency;
mod error;
mod identity;
pub mod observer;
mod options;
mod path;
mod proxy;
mod slot;
mod subscriber;
pub mod tracking;
mod value;
mod vm;

pub use dependency::{Dependency, NotifyReport, SubscriberFailure, Watcher};
pub use error::{Error, Result};
pub use identity::{DepId, SubscriberId};
pub use observer::{observe, Node, NodeKind, NodeRef, Property};
pub use options::Options;
pub use path::Path;
pub use slot::{PlainRef, Slot};
pub use subscriber::{Callback, Subscriber};
pub use tracking::TrackingScope;
pub use value::{Value, ValueMap};
pub use vm::ViewModel;
