// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard observer: state tracking, delegate delivery, and frame queries.
//!
//! ## Event flow
//!
//! 1) A frame-change [`Notification`] arrives, either through a subscribed
//!    [`NotificationCenter`] or a direct call to [`KeyboardObserver::handle`].
//! 2) The payload is parsed into a [`NotificationInfo`]. Malformed events are dropped and
//!    never touch state or delegates.
//! 3) If the ending frame equals the tracked one, the event is suppressed.
//! 4) Otherwise the tracked info is replaced and every live delegate is told the animation
//!    duration and curve, synchronously and exactly once.
//!
//! Will-change and did-change events are handled identically. The platform sends both for
//! each transition, so the second is normally suppressed.
//!
//! ## Re-entrancy
//!
//! Delegates receive the observer and may query it, or add and remove delegates, from inside
//! the callback. Delivery iterates a snapshot taken before the first callback.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use tracing::{debug, trace};

use crate::geometry;
use crate::info::{NotificationInfo, ParseError};
use crate::notification::{Notification, NotificationCenter, NotificationName, NotificationObserver};
use crate::registry::WeakRegistry;
use crate::types::{AnimationCurve, KeyboardFrame, ViewGeometry};

/// Receives keyboard frame changes from a [`KeyboardObserver`].
pub trait KeyboardObserverDelegate {
    /// The keyboard frame is changing. Animate alongside it using `animation_duration`
    /// (seconds) and `animation_curve`, and query `observer` for the new frame.
    fn keyboard_frame_will_change(
        &self,
        observer: &KeyboardObserver,
        animation_duration: f64,
        animation_curve: AnimationCurve,
    );
}

/// What [`KeyboardObserver::handle`] did with a notification.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameChange {
    /// The frame changed; delegates were notified.
    Changed,
    /// The frame matched the tracked one; nothing happened.
    Unchanged,
    /// Not a frame-change notification.
    Ignored,
}

/// Tracked keyboard state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum KeyboardState {
    /// No valid event received yet.
    #[default]
    NoData,
    /// The most recently applied event.
    Known(NotificationInfo),
}

impl KeyboardState {
    fn info(&self) -> Option<&NotificationInfo> {
        match self {
            Self::NoData => None,
            Self::Known(info) => Some(info),
        }
    }

    /// Apply `info`, returning `false` when its frame matches the tracked one.
    fn apply(&mut self, info: NotificationInfo) -> bool {
        if let Self::Known(current) = self
            && current.ending_frame() == info.ending_frame()
        {
            return false;
        }
        *self = Self::Known(info);
        true
    }
}

/// Tracks the on-screen keyboard and notifies delegates when its frame changes.
///
/// Delegates are held weakly; see [`WeakRegistry`] for the pruning rules.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kurbo::{Affine, Rect};
/// use understory_keyboard::notification::{
///     ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_END_KEY, Notification, NotificationName,
///     UserInfo, Value,
/// };
/// use understory_keyboard::{
///     AnimationCurve, KeyboardFrame, KeyboardObserver, KeyboardObserverDelegate, PlacedView,
///     Screen, ScreenId,
/// };
///
/// #[derive(Default)]
/// struct Calls(Cell<usize>);
///
/// impl KeyboardObserverDelegate for Calls {
///     fn keyboard_frame_will_change(&self, _: &KeyboardObserver, _: f64, _: AnimationCurve) {
///         self.0.set(self.0.get() + 1);
///     }
/// }
///
/// let observer = KeyboardObserver::new();
/// let delegate = Rc::new(Calls::default());
/// observer.add_delegate(&delegate);
///
/// let screen = Screen::new(ScreenId(0), Rect::new(0.0, 0.0, 400.0, 800.0));
/// let keyboard = Rect::new(0.0, 500.0, 400.0, 800.0);
/// let user_info = UserInfo::new()
///     .with(FRAME_END_KEY, Value::Rect(keyboard))
///     .with(ANIMATION_DURATION_KEY, Value::Float(0.25))
///     .with(ANIMATION_CURVE_KEY, Value::Integer(7));
/// let posted = Notification::new(
///     NotificationName::KeyboardWillChangeFrame,
///     Some(Rc::new(screen)),
///     Some(user_info),
/// );
/// observer.handle(&posted).unwrap();
/// observer.handle(&posted).unwrap();
/// assert_eq!(delegate.0.get(), 1);
///
/// let view = PlacedView::on_screen(screen.bounds, screen, Affine::IDENTITY);
/// assert_eq!(observer.current_frame(&view), Some(KeyboardFrame::Overlapping(keyboard)));
/// assert!(!observer.is_keyboard_floating(&view));
/// ```
#[derive(Default)]
pub struct KeyboardObserver {
    delegates: RefCell<WeakRegistry<dyn KeyboardObserverDelegate>>,
    state: RefCell<KeyboardState>,
}

impl core::fmt::Debug for KeyboardObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyboardObserver")
            .field("delegates", &self.delegates)
            .field("state", &self.state)
            .finish()
    }
}

impl KeyboardObserver {
    /// Create an observer that is not subscribed to any event source.
    ///
    /// Feed it with [`KeyboardObserver::handle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an observer subscribed to the frame-change events of `center`.
    ///
    /// The center holds the observer weakly; it unsubscribes when the returned `Rc` is dropped.
    pub fn with_center(center: &NotificationCenter) -> Rc<Self> {
        let observer = Rc::new(Self::new());
        let weak = Rc::downgrade(&observer);
        let weak: Weak<dyn NotificationObserver> = weak;
        center.add_observer(NotificationName::KeyboardWillChangeFrame, weak.clone());
        center.add_observer(NotificationName::KeyboardDidChangeFrame, weak);
        observer
    }

    /// The thread's shared observer, subscribed to
    /// [`NotificationCenter::default_center`].
    ///
    /// Created on first use and kept for the life of the thread. Hosts deliver keyboard
    /// events on their UI thread, which makes this the app-wide instance.
    #[cfg(feature = "std")]
    pub fn shared() -> Rc<Self> {
        std::thread_local! {
            static SHARED: Rc<KeyboardObserver> =
                KeyboardObserver::with_center(&NotificationCenter::default_center());
        }
        SHARED.with(Rc::clone)
    }

    /// Register `delegate` for frame changes. Adding the same delegate twice has no effect.
    pub fn add_delegate<D: KeyboardObserverDelegate + 'static>(&self, delegate: &Rc<D>) {
        let weak = Rc::downgrade(delegate);
        let weak: Weak<dyn KeyboardObserverDelegate> = weak;
        self.add_weak_delegate(weak);
    }

    /// Unregister `delegate`. No effect if it was not registered.
    pub fn remove_delegate<D: KeyboardObserverDelegate + 'static>(&self, delegate: &Rc<D>) {
        let weak = Rc::downgrade(delegate);
        let weak: Weak<dyn KeyboardObserverDelegate> = weak;
        self.remove_weak_delegate(&weak);
    }

    /// Register an already type-erased delegate.
    ///
    /// Use this when the host holds an `Rc<dyn KeyboardObserverDelegate>`. Dead or already
    /// registered delegates are ignored.
    pub fn add_weak_delegate(&self, delegate: Weak<dyn KeyboardObserverDelegate>) {
        self.delegates.borrow_mut().add(delegate);
    }

    /// Unregister a type-erased delegate. Identity is the pointee, as in
    /// [`KeyboardObserver::remove_delegate`].
    pub fn remove_weak_delegate(&self, delegate: &Weak<dyn KeyboardObserverDelegate>) {
        self.delegates.borrow_mut().remove(delegate);
    }

    /// Number of live delegates.
    pub fn delegate_count(&self) -> usize {
        self.delegates.borrow_mut().count()
    }

    /// The most recently applied keyboard event, if any.
    pub fn latest_info(&self) -> Option<NotificationInfo> {
        self.state.borrow().info().copied()
    }

    /// Process a keyboard notification.
    ///
    /// Frame-change notifications are parsed and, when the frame differs from the tracked
    /// one, applied and delivered to delegates before this returns.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] for a malformed frame-change payload. The event is dropped
    /// and tracked state is left as it was.
    pub fn handle(&self, notification: &Notification) -> Result<FrameChange, ParseError> {
        if !notification.name.is_frame_change() {
            return Ok(FrameChange::Ignored);
        }
        let info = NotificationInfo::parse(notification)?;

        if !self.state.borrow_mut().apply(info) {
            trace!(frame = ?info.ending_frame(), "keyboard frame unchanged, suppressing");
            return Ok(FrameChange::Unchanged);
        }

        let delegates = self.delegates.borrow_mut().snapshot();
        trace!(
            event = ?notification.name,
            frame = ?info.ending_frame(),
            delegates = delegates.len(),
            "keyboard frame changed"
        );
        for delegate in delegates {
            delegate.keyboard_frame_will_change(
                self,
                info.animation_duration(),
                info.animation_curve(),
            );
        }
        Ok(FrameChange::Changed)
    }

    /// The keyboard frame relative to `view`.
    ///
    /// Returns `None` before any keyboard event, or when `view` is not placed on a display
    /// through an invertible transform.
    pub fn current_frame<V: ViewGeometry + ?Sized>(&self, view: &V) -> Option<KeyboardFrame> {
        let info = self.latest_info()?;
        geometry::resolve_frame(&info, view)
    }

    /// Returns true if the keyboard is narrower than the screen hosting it.
    ///
    /// The hosting screen is the one the last event named, falling back to the screen
    /// `view` is placed on. Returns `false` before any keyboard event.
    pub fn is_keyboard_floating<V: ViewGeometry + ?Sized>(&self, view: &V) -> bool {
        self.latest_info()
            .is_some_and(|info| geometry::is_floating(&info, view))
    }
}

impl NotificationObserver for KeyboardObserver {
    fn receive(&self, notification: &Notification) {
        if let Err(error) = self.handle(notification) {
            debug!(event = ?notification.name, %error, "dropping malformed keyboard event");
        }
    }
}
