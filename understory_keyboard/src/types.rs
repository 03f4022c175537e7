// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the crate: curves, screens, views, and overlap results.

use kurbo::{Affine, Rect};

/// Animation curve reported with a keyboard frame change.
///
/// The named variants carry the platform's public curve codes. The keyboard
/// frequently reports codes outside that set (for example `7`), which are
/// preserved as [`AnimationCurve::Other`] so callers can hand them straight
/// back to the platform animator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AnimationCurve {
    /// Slow at the beginning and end (code `0`).
    EaseInOut,
    /// Slow at the beginning (code `1`).
    EaseIn,
    /// Slow at the end (code `2`).
    EaseOut,
    /// Constant speed (code `3`).
    Linear,
    /// Any other platform curve code.
    Other(i32),
}

impl AnimationCurve {
    /// Map a raw platform code to a curve.
    ///
    /// Returns `None` when the code does not fit the platform's 32-bit curve type.
    pub fn from_raw(code: i64) -> Option<Self> {
        let code = i32::try_from(code).ok()?;
        Some(match code {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            other => Self::Other(other),
        })
    }

    /// The raw platform code for this curve.
    pub const fn raw(self) -> i32 {
        match self {
            Self::EaseInOut => 0,
            Self::EaseIn => 1,
            Self::EaseOut => 2,
            Self::Linear => 3,
            Self::Other(code) => code,
        }
    }
}

/// Identifier for a display.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ScreenId(pub u32);

/// A display that can host views and the keyboard.
///
/// Keyboard frames are reported in the coordinate space of a screen, whose
/// `bounds` span the full display.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Screen {
    /// Identity of the display.
    pub id: ScreenId,
    /// Full display bounds in the screen's own coordinate space.
    pub bounds: Rect,
}

impl Screen {
    /// Create a screen with the given identity and bounds.
    pub const fn new(id: ScreenId, bounds: Rect) -> Self {
        Self { id, bounds }
    }
}

/// Where a view currently sits on a display.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenPlacement {
    /// The display hosting the view's window.
    pub screen: Screen,
    /// Maps view-local coordinates into the screen's coordinate space.
    pub to_screen: Affine,
}

/// Geometry of a view that keyboard frames can be resolved against.
///
/// Implement this for your toolkit's view handle. A view that is not attached
/// to a window on any display has no placement, and frame queries against it
/// return `None`.
pub trait ViewGeometry {
    /// Local bounds of the view.
    fn bounds(&self) -> Rect;

    /// Current placement on a display, or `None` while detached.
    fn placement(&self) -> Option<ScreenPlacement>;
}

impl<V: ViewGeometry + ?Sized> ViewGeometry for &V {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn placement(&self) -> Option<ScreenPlacement> {
        (**self).placement()
    }
}

/// A plain-data [`ViewGeometry`] for hosts that already track view geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedView {
    /// Local bounds.
    pub bounds: Rect,
    /// Placement on a display, if attached.
    pub placement: Option<ScreenPlacement>,
}

impl PlacedView {
    /// A view with the given bounds that is not attached to any display.
    pub const fn detached(bounds: Rect) -> Self {
        Self {
            bounds,
            placement: None,
        }
    }

    /// A view placed on `screen`, with `to_screen` mapping view-local coordinates to the screen.
    pub const fn on_screen(bounds: Rect, screen: Screen, to_screen: Affine) -> Self {
        Self {
            bounds,
            placement: Some(ScreenPlacement { screen, to_screen }),
        }
    }
}

impl ViewGeometry for PlacedView {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn placement(&self) -> Option<ScreenPlacement> {
        self.placement
    }
}

/// The keyboard frame classified relative to a view.
///
/// Returned by [`KeyboardObserver::current_frame`](crate::KeyboardObserver::current_frame).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyboardFrame {
    /// The keyboard overlaps the view. Carries the full keyboard frame in the
    /// view's coordinate space, not clipped to the view's bounds.
    ///
    /// A floating keyboard that is being dragged reports [`Rect::ZERO`]; see
    /// [`KeyboardFrame::is_hidden_while_dragging`].
    Overlapping(Rect),
    /// The keyboard does not overlap the view.
    NonOverlapping,
}

impl KeyboardFrame {
    /// The keyboard frame when overlapping.
    pub fn frame(&self) -> Option<Rect> {
        match self {
            Self::Overlapping(frame) => Some(*frame),
            Self::NonOverlapping => None,
        }
    }

    /// True for the all-zero frame reported while a floating keyboard is dragged.
    ///
    /// Callers sizing an overlay from the frame should hide it in this case.
    pub fn is_hidden_while_dragging(&self) -> bool {
        matches!(self, Self::Overlapping(frame) if *frame == Rect::ZERO)
    }

    /// How far the keyboard reaches up into `bounds`, measured from its bottom edge.
    ///
    /// Zero when not overlapping.
    pub fn overlap_height(&self, bounds: Rect) -> f64 {
        match self {
            Self::Overlapping(frame) => (bounds.y1 - frame.y0).max(0.0),
            Self::NonOverlapping => 0.0,
        }
    }
}
