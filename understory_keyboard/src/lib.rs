// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Keyboard: track the on-screen keyboard and resolve it against your views.
//!
//! ## Overview
//!
//! Mobile platforms announce keyboard movement as loosely-typed events: a name, a source object,
//! and a key-value payload with the ending frame, animation duration, and animation curve.
//! This crate turns those events into typed state and answers the question UI code actually has:
//! does the keyboard cover this view, and where?
//!
//! - [`NotificationInfo::parse`] validates a payload into a typed record, or a [`ParseError`].
//! - [`KeyboardObserver`] tracks the latest frame, drops same-frame duplicates, and tells weakly
//!   held [`KeyboardObserverDelegate`]s how to animate alongside the keyboard.
//! - [`KeyboardObserver::current_frame`] classifies the keyboard as
//!   [`Overlapping`](KeyboardFrame::Overlapping) or
//!   [`NonOverlapping`](KeyboardFrame::NonOverlapping) relative to any [`ViewGeometry`].
//! - [`KeyboardObserver::is_keyboard_floating`] tells docked (full display width) keyboards from
//!   floating ones.
//!
//! It does not deliver platform events, render, or animate.
//! Hosts forward events through a [`NotificationCenter`] (or call [`KeyboardObserver::handle`]),
//! and drive their own animations from the reported duration and curve.
//!
//! ## Threading
//!
//! Everything here is single-threaded and synchronous. Events are expected on the UI thread,
//! in order, and each is fully processed before the next.
//!
//! ## Floating keyboards
//!
//! While a floating keyboard is dragged the platform reports an all-zero frame. It is classified
//! as `Overlapping(Rect::ZERO)`; check [`KeyboardFrame::is_hidden_while_dragging`] and hide any
//! overlay sized from the frame.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::{Affine, Rect};
//! use understory_keyboard::notification::{
//!     ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_END_KEY, Notification, NotificationName,
//!     UserInfo, Value,
//! };
//! use understory_keyboard::{
//!     KeyboardFrame, KeyboardObserver, NotificationCenter, PlacedView, Screen, ScreenId,
//! };
//!
//! let center = NotificationCenter::new();
//! let observer = KeyboardObserver::with_center(&center);
//!
//! let screen = Screen::new(ScreenId(0), Rect::new(0.0, 0.0, 400.0, 800.0));
//! let view = PlacedView::on_screen(Rect::new(0.0, 0.0, 400.0, 800.0), screen, Affine::IDENTITY);
//! assert_eq!(observer.current_frame(&view), None);
//!
//! let user_info = UserInfo::new()
//!     .with(FRAME_END_KEY, Value::Rect(Rect::new(0.0, 900.0, 400.0, 1200.0)))
//!     .with(ANIMATION_DURATION_KEY, Value::Float(0.25))
//!     .with(ANIMATION_CURVE_KEY, Value::Integer(7));
//! center.post(&Notification::new(
//!     NotificationName::KeyboardDidChangeFrame,
//!     Some(Rc::new(screen)),
//!     Some(user_info),
//! ));
//!
//! assert_eq!(observer.current_frame(&view), Some(KeyboardFrame::NonOverlapping));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default) adds the shared
//! per-thread [`KeyboardObserver::shared`] and [`NotificationCenter::default_center`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod geometry;
pub mod info;
pub mod notification;
pub mod observer;
pub mod registry;
pub mod types;

pub use info::{NotificationInfo, ParseError};
pub use notification::{Notification, NotificationCenter, NotificationName, NotificationObserver};
pub use observer::{FrameChange, KeyboardObserver, KeyboardObserverDelegate};
pub use types::{
    AnimationCurve, KeyboardFrame, PlacedView, Screen, ScreenId, ScreenPlacement, ViewGeometry,
};
