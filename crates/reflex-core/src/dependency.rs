//! Per-property subscriber lists
//!
//! A [`Dependency`] belongs to exactly one wrapped property and records every
//! [`Watcher`] that read the property while tracking was active. Watchers are
//! held weakly; a dropped subscriber is skipped and pruned during the next
//! [`notify`](Dependency::notify).

use crate::{DepId, Error, Result, SubscriberId};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Something that re-evaluates when a property it read has changed
pub trait Watcher {
    /// Identity used for deduplicating registrations
    fn id(&self) -> SubscriberId;

    /// Re-read and react to the change
    fn update(self: Rc<Self>) -> Result<()>;
}

/// A subscriber whose update failed during a notification
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberFailure {
    pub subscriber: SubscriberId,
    pub error: Error,
}

/// Outcome of a write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyReport {
    /// Whether the write changed the stored value
    ///
    /// Writes below a plain composite can change it without notifying anyone,
    /// so `changed` with `delivered == 0` is possible.
    pub changed: bool,
    /// Subscribers whose update completed
    pub delivered: usize,
    /// Subscribers whose update failed; siblings were still delivered
    pub failures: Vec<SubscriberFailure>,
}

impl NotifyReport {
    /// Report for a write that left the value as it was
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Report for a write that stored a new value nobody tracks
    pub fn untracked(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }

    /// True when no subscriber failed
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: NotifyReport) {
        self.changed |= other.changed;
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }
}

/// Ordered list of watchers interested in one property
pub struct Dependency {
    id: DepId,
    subs: RefCell<Vec<Weak<dyn Watcher>>>,
    /// Number of notify calls so far
    version: Cell<u64>,
}

impl Dependency {
    pub fn new() -> Self {
        Self {
            id: DepId::next(),
            subs: RefCell::new(Vec::new()),
            version: Cell::new(0),
        }
    }

    pub fn id(&self) -> DepId {
        self.id
    }

    /// Register a watcher
    ///
    /// Returns `false` if a live watcher with the same ID is already listed.
    /// Entries of dropped watchers are pruned here as well as in `notify`.
    pub fn add_sub(&self, watcher: &Rc<dyn Watcher>) -> bool {
        let id = watcher.id();
        self.subs.borrow_mut().retain(|w| w.strong_count() > 0);
        if self.contains(id) {
            return false;
        }
        self.subs.borrow_mut().push(Rc::downgrade(watcher));
        tracing::debug!(dep = %self.id, subscriber = %id, "subscriber registered");
        true
    }

    /// Whether a live watcher with this ID is registered
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subs
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .any(|w| w.id() == id)
    }

    /// IDs of live watchers, in registration order
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.subs
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|w| w.id())
            .collect()
    }

    /// Number of live watchers
    pub fn len(&self) -> usize {
        self.subs
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times [`notify`](Self::notify) has run
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Update every registered watcher in registration order
    ///
    /// A failing watcher is logged and recorded in the report; the rest are
    /// still updated. Watchers registered while this runs are picked up by
    /// the next notification, not this one.
    pub fn notify(&self) -> NotifyReport {
        self.version.set(self.version.get() + 1);
        let subs: Vec<Weak<dyn Watcher>> = self.subs.borrow().clone();
        tracing::debug!(
            dep = %self.id,
            subscribers = subs.len(),
            "property changed, notifying subscribers"
        );

        let mut report = NotifyReport {
            changed: true,
            ..NotifyReport::default()
        };
        let mut dead = 0;
        for weak in subs {
            let Some(watcher) = weak.upgrade() else {
                dead += 1;
                continue;
            };
            let id = watcher.id();
            match watcher.update() {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    tracing::warn!(dep = %self.id, subscriber = %id, %error, "subscriber update failed");
                    report.failures.push(SubscriberFailure {
                        subscriber: id,
                        error,
                    });
                }
            }
        }

        if dead > 0 {
            self.subs.borrow_mut().retain(|w| w.strong_count() > 0);
        }
        report
    }
}

impl Default for Dependency {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.id)
            .field("subscribers", &self.subscriber_ids())
            .field("version", &self.version.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records its ID into a shared log when updated
    struct Recorder {
        id: SubscriberId,
        log: Rc<RefCell<Vec<SubscriberId>>>,
        fail: bool,
    }

    impl Watcher for Recorder {
        fn id(&self) -> SubscriberId {
            self.id
        }

        fn update(self: Rc<Self>) -> Result<()> {
            self.log.borrow_mut().push(self.id);
            if self.fail {
                Err(Error::callback("boom"))
            } else {
                Ok(())
            }
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<SubscriberId>>>, fail: bool) -> Rc<dyn Watcher> {
        Rc::new(Recorder {
            id: SubscriberId::next(),
            log: Rc::clone(log),
            fail,
        })
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dependency::new();
        let a = recorder(&log, false);
        let b = recorder(&log, false);
        dep.add_sub(&a);
        dep.add_sub(&b);

        let report = dep.notify();
        assert!(report.changed);
        assert_eq!(report.delivered, 2);
        assert_eq!(*log.borrow(), vec![a.id(), b.id()]);
        assert_eq!(dep.version(), 1);
    }

    #[test]
    fn test_add_sub_deduplicates() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dependency::new();
        let a = recorder(&log, false);
        assert!(dep.add_sub(&a));
        assert!(!dep.add_sub(&a));
        assert_eq!(dep.len(), 1);

        dep.notify();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_failure_does_not_block_siblings() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dependency::new();
        let bad = recorder(&log, true);
        let good = recorder(&log, false);
        dep.add_sub(&bad);
        dep.add_sub(&good);

        let report = dep.notify();
        assert!(!report.is_ok());
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subscriber, bad.id());
        assert_eq!(*log.borrow(), vec![bad.id(), good.id()]);
    }

    #[test]
    fn test_dropped_watchers_are_pruned() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dependency::new();
        let keep = recorder(&log, false);
        {
            let gone = recorder(&log, false);
            dep.add_sub(&gone);
        }
        dep.add_sub(&keep);
        assert_eq!(dep.len(), 1);

        let report = dep.notify();
        assert_eq!(report.delivered, 1);
        assert_eq!(*log.borrow(), vec![keep.id()]);
        assert_eq!(dep.subscriber_ids(), vec![keep.id()]);
    }

    #[test]
    fn test_add_sub_prunes_dropped_watchers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dependency::new();
        for _ in 0..3 {
            let gone = recorder(&log, false);
            dep.add_sub(&gone);
        }
        assert_eq!(dep.subs.borrow().len(), 1);

        let keep = recorder(&log, false);
        dep.add_sub(&keep);
        assert_eq!(dep.subs.borrow().len(), 1);
        assert_eq!(dep.version(), 0);
    }

    #[test]
    fn test_report_merge() {
        let mut a = NotifyReport::unchanged();
        let b = NotifyReport {
            changed: true,
            delivered: 2,
            failures: Vec::new(),
        };
        a.merge(b);
        assert!(a.changed);
        assert_eq!(a.delivered, 2);
        assert!(a.is_ok());
    }
}
