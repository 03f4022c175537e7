// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Untyped keyboard events and a synchronous notification bus.
//!
//! ## Overview
//!
//! The host platform delivers keyboard events as a [`Notification`]: a name, an optional
//! source object, and an untyped [`UserInfo`] payload. Nothing in this module validates the
//! payload; [`NotificationInfo::parse`](crate::NotificationInfo::parse) does that.
//!
//! [`NotificationCenter`] is the injectable event source. It delivers posts synchronously,
//! in registration order, on the calling thread. Observers are held weakly.
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_keyboard::{KeyboardObserver, NotificationCenter};
//! use understory_keyboard::notification::{
//!     ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_END_KEY, Notification, NotificationName,
//!     UserInfo, Value,
//! };
//!
//! let center = NotificationCenter::new();
//! let observer = KeyboardObserver::with_center(&center);
//!
//! let user_info = UserInfo::new()
//!     .with(FRAME_END_KEY, Value::Rect(Rect::new(0.0, 500.0, 400.0, 800.0)))
//!     .with(ANIMATION_DURATION_KEY, Value::Float(0.25))
//!     .with(ANIMATION_CURVE_KEY, Value::Integer(7));
//! center.post(&Notification::new(
//!     NotificationName::KeyboardDidChangeFrame,
//!     None,
//!     Some(user_info),
//! ));
//!
//! assert!(observer.latest_info().is_some());
//! ```

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::any::Any;
use core::cell::RefCell;

use kurbo::Rect;

use crate::registry::WeakRegistry;

/// Payload key for the keyboard frame at the start of the change.
pub const FRAME_BEGIN_KEY: &str = "keyboard.frame.begin";
/// Payload key for the keyboard frame at the end of the change.
pub const FRAME_END_KEY: &str = "keyboard.frame.end";
/// Payload key for the animation duration in seconds.
pub const ANIMATION_DURATION_KEY: &str = "keyboard.animation.duration";
/// Payload key for the animation curve code.
pub const ANIMATION_CURVE_KEY: &str = "keyboard.animation.curve";
/// Payload key for whether the keyboard belongs to the current app.
pub const IS_LOCAL_KEY: &str = "keyboard.is_local";

/// Names of keyboard events posted by the host platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum NotificationName {
    /// The keyboard frame is about to change.
    KeyboardWillChangeFrame,
    /// The keyboard frame changed.
    KeyboardDidChangeFrame,
    /// The keyboard is about to be shown.
    KeyboardWillShow,
    /// The keyboard was shown.
    KeyboardDidShow,
    /// The keyboard is about to be hidden.
    KeyboardWillHide,
    /// The keyboard was hidden.
    KeyboardDidHide,
}

impl NotificationName {
    /// Returns true for the two frame-change events.
    pub const fn is_frame_change(self) -> bool {
        matches!(
            self,
            Self::KeyboardWillChangeFrame | Self::KeyboardDidChangeFrame
        )
    }
}

/// A loosely-typed payload value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A rectangle.
    Rect(Rect),
    /// A floating point number.
    Float(f64),
    /// An integer.
    Integer(i64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Text(String),
}

/// Untyped key-value payload carried by a [`Notification`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserInfo {
    entries: BTreeMap<String, Value>,
}

impl UserInfo {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`UserInfo::insert`].
    #[must_use]
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for `key`.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.entries.insert(String::from(key), value)
    }

    /// Remove and return the value for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// The value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named event with an optional source object and an untyped payload.
#[derive(Clone, Debug)]
pub struct Notification {
    /// Event name.
    pub name: NotificationName,
    /// The posting object. For keyboard events this is usually the [`Screen`](crate::Screen)
    /// the frames are reported against.
    pub object: Option<Rc<dyn Any>>,
    /// Event payload.
    pub user_info: Option<UserInfo>,
}

impl Notification {
    /// Create a notification.
    pub fn new(
        name: NotificationName,
        object: Option<Rc<dyn Any>>,
        user_info: Option<UserInfo>,
    ) -> Self {
        Self {
            name,
            object,
            user_info,
        }
    }
}

/// Receives notifications from a [`NotificationCenter`].
pub trait NotificationObserver {
    /// Called synchronously for each matching post.
    fn receive(&self, notification: &Notification);
}

/// Synchronous, single-threaded notification bus.
///
/// Observers are registered per [`NotificationName`] and held weakly: dropping the last
/// strong reference to an observer unsubscribes it.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    observers: RefCell<BTreeMap<NotificationName, WeakRegistry<dyn NotificationObserver>>>,
}

impl NotificationCenter {
    /// Create a center with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The thread's default center, created on first use and never torn down.
    #[cfg(feature = "std")]
    pub fn default_center() -> Rc<Self> {
        std::thread_local! {
            static DEFAULT: Rc<NotificationCenter> = Rc::new(NotificationCenter::new());
        }
        DEFAULT.with(Rc::clone)
    }

    /// Subscribe `observer` to posts named `name`. Returns `false` if already subscribed.
    pub fn add_observer(
        &self,
        name: NotificationName,
        observer: Weak<dyn NotificationObserver>,
    ) -> bool {
        self.observers
            .borrow_mut()
            .entry(name)
            .or_default()
            .add(observer)
    }

    /// Unsubscribe `observer` from posts named `name`. Returns `false` if not subscribed.
    pub fn remove_observer(
        &self,
        name: NotificationName,
        observer: &Weak<dyn NotificationObserver>,
    ) -> bool {
        self.observers
            .borrow_mut()
            .get_mut(&name)
            .is_some_and(|registry| registry.remove(observer))
    }

    /// Number of live observers for `name`.
    pub fn observer_count(&self, name: NotificationName) -> usize {
        self.observers
            .borrow_mut()
            .get_mut(&name)
            .map_or(0, WeakRegistry::count)
    }

    /// Deliver `notification` to every live observer of its name.
    pub fn post(&self, notification: &Notification) {
        let targets = match self.observers.borrow_mut().get_mut(&notification.name) {
            Some(registry) => registry.snapshot(),
            None => return,
        };
        for observer in targets {
            observer.receive(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::Cell;

    #[derive(Default)]
    struct Counter {
        received: Cell<usize>,
    }

    impl NotificationObserver for Counter {
        fn receive(&self, _notification: &Notification) {
            self.received.set(self.received.get() + 1);
        }
    }

    fn weak(counter: &Rc<Counter>) -> Weak<dyn NotificationObserver> {
        let weak = Rc::downgrade(counter);
        let weak: Weak<dyn NotificationObserver> = weak;
        weak
    }

    fn post(center: &NotificationCenter, name: NotificationName) {
        center.post(&Notification::new(name, None, None));
    }

    #[test]
    fn user_info_insert_and_remove() {
        let mut info = UserInfo::new().with(ANIMATION_DURATION_KEY, Value::Float(0.25));
        assert_eq!(info.get(ANIMATION_DURATION_KEY), Some(&Value::Float(0.25)));
        assert_eq!(
            info.insert(ANIMATION_DURATION_KEY, Value::Integer(1)),
            Some(Value::Float(0.25))
        );
        assert_eq!(info.len(), 1);
        assert_eq!(info.remove(ANIMATION_DURATION_KEY), Some(Value::Integer(1)));
        assert!(info.is_empty());
    }

    #[test]
    fn frame_change_names() {
        assert!(NotificationName::KeyboardWillChangeFrame.is_frame_change());
        assert!(NotificationName::KeyboardDidChangeFrame.is_frame_change());
        assert!(!NotificationName::KeyboardDidShow.is_frame_change());
    }

    #[test]
    fn posts_reach_only_matching_observers() {
        let center = NotificationCenter::new();
        let will = Rc::new(Counter::default());
        let did = Rc::new(Counter::default());
        center.add_observer(NotificationName::KeyboardWillChangeFrame, weak(&will));
        center.add_observer(NotificationName::KeyboardDidChangeFrame, weak(&did));

        post(&center, NotificationName::KeyboardWillChangeFrame);
        post(&center, NotificationName::KeyboardWillHide);

        assert_eq!(will.received.get(), 1);
        assert_eq!(did.received.get(), 0);
    }

    #[test]
    fn duplicate_subscription_delivers_once() {
        let center = NotificationCenter::new();
        let counter = Rc::new(Counter::default());
        assert!(center.add_observer(NotificationName::KeyboardDidShow, weak(&counter)));
        assert!(!center.add_observer(NotificationName::KeyboardDidShow, weak(&counter)));
        post(&center, NotificationName::KeyboardDidShow);
        assert_eq!(counter.received.get(), 1);
    }

    #[test]
    fn dropped_observers_are_unsubscribed() {
        let center = NotificationCenter::new();
        let kept = Rc::new(Counter::default());
        let dropped = Rc::new(Counter::default());
        center.add_observer(NotificationName::KeyboardDidHide, weak(&kept));
        center.add_observer(NotificationName::KeyboardDidHide, weak(&dropped));
        drop(dropped);
        assert_eq!(center.observer_count(NotificationName::KeyboardDidHide), 1);
        post(&center, NotificationName::KeyboardDidHide);
        assert_eq!(kept.received.get(), 1);
    }

    #[test]
    fn remove_observer_stops_delivery() {
        let center = NotificationCenter::new();
        let counter = Rc::new(Counter::default());
        center.add_observer(NotificationName::KeyboardWillShow, weak(&counter));
        assert!(center.remove_observer(NotificationName::KeyboardWillShow, &weak(&counter)));
        assert!(!center.remove_observer(NotificationName::KeyboardWillShow, &weak(&counter)));
        post(&center, NotificationName::KeyboardWillShow);
        assert_eq!(counter.received.get(), 0);
    }

    struct Reentrant {
        center: Rc<NotificationCenter>,
        late: Rc<Counter>,
        seen: RefCell<Vec<NotificationName>>,
    }

    impl NotificationObserver for Reentrant {
        fn receive(&self, notification: &Notification) {
            self.seen.borrow_mut().push(notification.name);
            self.center
                .add_observer(notification.name, weak(&self.late));
        }
    }

    #[test]
    fn observers_may_subscribe_during_delivery() {
        let center = Rc::new(NotificationCenter::new());
        let observer = Rc::new(Reentrant {
            center: Rc::clone(&center),
            late: Rc::new(Counter::default()),
            seen: RefCell::new(Vec::new()),
        });
        let weak_observer = Rc::downgrade(&observer);
        let weak_observer: Weak<dyn NotificationObserver> = weak_observer;
        center.add_observer(NotificationName::KeyboardDidShow, weak_observer);

        post(&center, NotificationName::KeyboardDidShow);
        // The late subscriber joins after the snapshot, so it only sees the second post.
        assert_eq!(observer.late.received.get(), 0);
        post(&center, NotificationName::KeyboardDidShow);
        assert_eq!(observer.late.received.get(), 1);
        assert_eq!(observer.seen.borrow().len(), 2);
    }
}
