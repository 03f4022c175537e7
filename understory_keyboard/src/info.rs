// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed view of a keyboard frame-change payload.

use kurbo::Rect;
use thiserror::Error;

use crate::notification::{
    ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_END_KEY, Notification, UserInfo, Value,
};
use crate::types::{AnimationCurve, Screen};

/// Why a payload could not be turned into a [`NotificationInfo`].
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// The notification carried no payload.
    #[error("keyboard notification has no user info")]
    MissingUserInfo,
    /// The ending frame is absent, not a rectangle, or has a non-finite coordinate.
    #[error("keyboard notification has no ending frame")]
    MissingEndingFrame,
    /// The animation duration is absent or not a finite, non-negative number.
    #[error("keyboard notification has no animation duration")]
    MissingAnimationDuration,
    /// The animation curve is absent, not an integer, or out of range.
    #[error("keyboard notification has no animation curve")]
    MissingAnimationCurve,
}

/// Validated contents of a keyboard frame-change notification.
///
/// Only produced by [`NotificationInfo::parse`]; immutable afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NotificationInfo {
    ending_frame: Rect,
    animation_duration: f64,
    animation_curve: AnimationCurve,
    screen: Option<Screen>,
}

impl NotificationInfo {
    /// Extract the typed record from `notification`.
    ///
    /// The screen is taken from the notification's object when it is a [`Screen`];
    /// any other object (or none) leaves it unset.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] for the first missing or malformed field, checked in
    /// the order payload, frame, duration, curve.
    ///
    /// # Examples
    ///
    /// ```
    /// use understory_keyboard::{NotificationInfo, ParseError};
    /// use understory_keyboard::notification::{Notification, NotificationName};
    ///
    /// let n = Notification::new(NotificationName::KeyboardWillChangeFrame, None, None);
    /// assert_eq!(NotificationInfo::parse(&n), Err(ParseError::MissingUserInfo));
    /// ```
    pub fn parse(notification: &Notification) -> Result<Self, ParseError> {
        let user_info = notification
            .user_info
            .as_ref()
            .ok_or(ParseError::MissingUserInfo)?;
        let screen = notification
            .object
            .as_deref()
            .and_then(|object| object.downcast_ref::<Screen>())
            .copied();
        Self::from_user_info(user_info, screen)
    }

    /// Extract the typed record from a bare payload and an already-resolved screen.
    ///
    /// # Errors
    ///
    /// Same as [`NotificationInfo::parse`], minus [`ParseError::MissingUserInfo`].
    pub fn from_user_info(
        user_info: &UserInfo,
        screen: Option<Screen>,
    ) -> Result<Self, ParseError> {
        let ending_frame = match user_info.get(FRAME_END_KEY) {
            Some(Value::Rect(rect)) if rect.is_finite() => *rect,
            _ => return Err(ParseError::MissingEndingFrame),
        };
        let animation_duration = user_info
            .get(ANIMATION_DURATION_KEY)
            .and_then(duration_seconds)
            .ok_or(ParseError::MissingAnimationDuration)?;
        let animation_curve = user_info
            .get(ANIMATION_CURVE_KEY)
            .and_then(curve_code)
            .and_then(AnimationCurve::from_raw)
            .ok_or(ParseError::MissingAnimationCurve)?;
        Ok(Self {
            ending_frame,
            animation_duration,
            animation_curve,
            screen,
        })
    }

    /// Keyboard frame at the end of the change, in the reporting screen's coordinates.
    pub fn ending_frame(&self) -> Rect {
        self.ending_frame
    }

    /// Animation duration in seconds.
    pub fn animation_duration(&self) -> f64 {
        self.animation_duration
    }

    /// Animation curve.
    pub fn animation_curve(&self) -> AnimationCurve {
        self.animation_curve
    }

    /// The screen the frame was reported against, if the event named one.
    pub fn screen(&self) -> Option<Screen> {
        self.screen
    }
}

fn duration_seconds(value: &Value) -> Option<f64> {
    let seconds = match *value {
        Value::Float(f) => f,
        #[allow(
            clippy::cast_precision_loss,
            reason = "Durations are small; exact above 2^53 is irrelevant."
        )]
        Value::Integer(i) => i as f64,
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

fn curve_code(value: &Value) -> Option<i64> {
    match *value {
        Value::Integer(i) => Some(i),
        // Only integral floats name a curve.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Checked integral and within i32 range before casting."
        )]
        Value::Float(f)
            if f.is_finite()
                && f == (f as i64) as f64
                && f >= f64::from(i32::MIN)
                && f <= f64::from(i32::MAX) =>
        {
            Some(f as i64)
        }
        _ => None,
    }
}
