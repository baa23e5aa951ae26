//! Subscribers: one consumer's interest in one property path
//!
//! Construction performs a single tracked read of the path, which registers
//! the subscriber with every wrapped property the read passes through. When
//! one of those properties changes, the subscriber re-reads the path and calls
//! its callback with the new value if it differs from the last one seen.
//!
//! # Invariants
//!
//! 1. The callback never runs during construction.
//! 2. The callback runs at most once per [`update`](Subscriber::update), and
//!    only when the re-read value is not strictly equal to the previous one.
//! 3. Re-evaluation is tracked as well, so a path whose intermediate node was
//!    replaced by a freshly observed one follows the new node.
//! 4. A callback that writes its own watched path is observed: the running
//!    update re-reads after the callback returns, until the value settles.
//! 5. The subscriber stays registered as long as a [`Subscriber`] handle is
//!    alive; dependencies hold it weakly.

use crate::dependency::Watcher;
use crate::tracking::{self, TrackingScope};
use crate::{Error, Path, Result, Slot, SubscriberId, Value, ViewModel};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Upper bound on refresh passes when a callback keeps writing its own path
const MAX_UPDATE_PASSES: usize = 100;

/// Callback invoked with the new value when a watched path changes
pub type Callback = Box<dyn FnMut(&Slot) -> Result<()>>;

struct SubscriberInner {
    id: SubscriberId,
    root: ViewModel,
    path: Path,
    /// Last observed value
    value: RefCell<Slot>,
    callback: RefCell<Callback>,
    updating: Cell<bool>,
    /// Set when a notification arrives while `updating`
    pending: Cell<bool>,
}

impl SubscriberInner {
    /// Read the path with this subscriber as the active reader
    fn evaluate(self: &Rc<Self>) -> Result<Slot> {
        let watcher: Rc<dyn Watcher> = Rc::clone(self) as Rc<dyn Watcher>;
        let _scope = TrackingScope::enter(watcher);
        self.root.get_path(&self.path)
    }

    fn run_update(self: &Rc<Self>) -> Result<bool> {
        if self.updating.replace(true) {
            // The running update re-reads once the callback returns.
            tracing::debug!(subscriber = %self.id, "deferring re-entrant update");
            self.pending.set(true);
            return Ok(false);
        }
        let result = self.settle();
        self.pending.set(false);
        self.updating.set(false);
        result
    }

    /// Refresh until no write made by the callback is left unobserved
    fn settle(self: &Rc<Self>) -> Result<bool> {
        let mut fired = false;
        for _ in 0..MAX_UPDATE_PASSES {
            self.pending.set(false);
            fired |= self.refresh()?;
            if !self.pending.get() {
                return Ok(fired);
            }
        }
        tracing::warn!(subscriber = %self.id, passes = MAX_UPDATE_PASSES, "update did not settle");
        Err(Error::Unsettled {
            subscriber: self.id,
            passes: MAX_UPDATE_PASSES,
        })
    }

    fn refresh(self: &Rc<Self>) -> Result<bool> {
        let new = self.evaluate()?;
        if self.value.borrow().same(&new) {
            return Ok(false);
        }
        self.value.replace(new.clone());
        let mut callback = self.callback.borrow_mut();
        tracking::untracked(|| (*callback)(&new))?;
        Ok(true)
    }
}

impl Watcher for SubscriberInner {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn update(self: Rc<Self>) -> Result<()> {
        self.run_update().map(|_| ())
    }
}

/// A consumer watching one property path of a root
///
/// Cloning yields another handle to the same subscriber.
///
/// # Example
///
/// ```
/// use reflex_core::{Options, Subscriber, Value, ViewModel};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let data: Value = [("count", 0i64)].into_iter().collect();
/// let vm = ViewModel::new(Options::new(data)).unwrap();
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&seen);
/// let _sub = Subscriber::new(&vm, "count", move |v| {
///     log.borrow_mut().push(v.to_value());
///     Ok(())
/// })
/// .unwrap();
///
/// vm.set("count", 1i64).unwrap();
/// assert_eq!(*seen.borrow(), vec![Value::Int(1)]);
/// ```
#[derive(Clone)]
#[must_use = "dropping the Subscriber unregisters it"]
pub struct Subscriber {
    inner: Rc<SubscriberInner>,
}

impl Subscriber {
    /// Watch `path` on `root`
    ///
    /// Fails with [`Error::PropertyNotFound`] or [`Error::NotAnObject`] if the
    /// path cannot be read right now.
    ///
    /// Dependencies only hold the subscriber weakly: keep the returned handle
    /// for as long as the subscription should stay live.
    #[must_use = "dropping the Subscriber unregisters it"]
    pub fn new(
        root: &ViewModel,
        path: impl Into<Path>,
        callback: impl FnMut(&Slot) -> Result<()> + 'static,
    ) -> Result<Self> {
        let inner = Rc::new(SubscriberInner {
            id: SubscriberId::next(),
            root: root.clone(),
            path: path.into(),
            value: RefCell::new(Slot::Value(Value::Null)),
            callback: RefCell::new(Box::new(callback)),
            updating: Cell::new(false),
            pending: Cell::new(false),
        });
        let value = inner.evaluate()?;
        inner.value.replace(value);
        tracing::debug!(subscriber = %inner.id, path = %inner.path, "subscriber created");
        Ok(Self { inner })
    }

    pub fn id(&self) -> SubscriberId {
        self.inner.id
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Last observed value
    pub fn value(&self) -> Slot {
        self.inner.value.borrow().clone()
    }

    /// Re-read the path; returns whether the callback ran
    ///
    /// Normally driven by the dependencies this subscriber registered with.
    pub fn update(&self) -> Result<bool> {
        self.inner.run_update()
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path)
            .field("value", &self.inner.value.borrow())
            .finish()
    }
}
