// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weakly-held, identity-deduplicated subscriber list.
//!
//! ## Semantics
//!
//! - Entries are [`Weak`] references; the registry never extends a subscriber's lifetime.
//! - Identity is the allocation address, not equality. Registering the same `Rc` twice is a no-op.
//! - Every method prunes dead entries first, so a released subscriber is absent by the next call
//!   without an explicit [`WeakRegistry::remove`].
//! - Iteration order is insertion order.
//!
//! ## Minimal example
//!
//! ```
//! use std::rc::{Rc, Weak};
//! use understory_keyboard::registry::WeakRegistry;
//!
//! let mut registry: WeakRegistry<str> = WeakRegistry::new();
//! let a: Rc<str> = Rc::from("a");
//! let b: Rc<str> = Rc::from("b");
//!
//! assert!(registry.add(Rc::downgrade(&a)));
//! assert!(!registry.add(Rc::downgrade(&a)));
//! assert!(registry.add(Rc::downgrade(&b)));
//! assert_eq!(registry.count(), 2);
//!
//! drop(b);
//! assert_eq!(registry.count(), 1);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

/// An ordered list of weak references, deduplicated by identity.
///
/// Used for keyboard delegates in [`KeyboardObserver`](crate::KeyboardObserver) and for
/// per-name observers in [`NotificationCenter`](crate::NotificationCenter).
pub struct WeakRegistry<T: ?Sized> {
    entries: Vec<Weak<T>>,
}

impl<T: ?Sized> core::fmt::Debug for WeakRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.entries.iter().filter(|e| e.strong_count() > 0).count();
        f.debug_struct("WeakRegistry")
            .field("entries", &self.entries.len())
            .field("alive", &alive)
            .finish()
    }
}

impl<T: ?Sized> Default for WeakRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> WeakRegistry<T> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `entry` unless a live entry with the same identity exists.
    ///
    /// Returns `true` if the entry was appended. A dead `entry` is never appended.
    pub fn add(&mut self, entry: Weak<T>) -> bool {
        self.prune();
        if entry.strong_count() == 0 || self.position(&entry).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry with the same identity as `entry`, if present.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, entry: &Weak<T>) -> bool {
        self.prune();
        match self.position(entry) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Returns true if a live entry with the same identity as `entry` is registered.
    pub fn contains(&mut self, entry: &Weak<T>) -> bool {
        self.prune();
        self.position(entry).is_some()
    }

    /// Number of live entries.
    pub fn count(&mut self) -> usize {
        self.prune();
        self.entries.len()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&mut self) -> bool {
        self.count() == 0
    }

    /// Strong references to every live entry, in insertion order.
    ///
    /// Callers deliver to the snapshot after releasing any borrow of the
    /// registry, so subscribers may re-enter and mutate it.
    pub fn snapshot(&mut self) -> Vec<Rc<T>> {
        self.prune();
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    fn prune(&mut self) {
        self.entries.retain(|e| e.strong_count() > 0);
    }

    fn position(&self, entry: &Weak<T>) -> Option<usize> {
        let target = entry.as_ptr().cast::<()>();
        self.entries
            .iter()
            .position(|e| core::ptr::eq(e.as_ptr().cast::<()>(), target))
    }
}
