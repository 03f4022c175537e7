// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-relative keyboard geometry.
//!
//! ## Resolution
//!
//! A keyboard frame is reported in the coordinates of a [`Screen`]. To compare it with a view,
//! the frame is mapped into the view's local space through the inverse of the view's
//! [`ScreenPlacement::to_screen`] transform. Under rotation or shear the mapped frame is the
//! conservative axis-aligned bounding box.
//!
//! ## Classification
//!
//! - The view must be placed on a display through an invertible transform; otherwise there is
//!   no coordinate space to compare against and resolution yields `None`.
//! - A frame reported against a different display than the view's never overlaps it.
//! - The all-zero frame reported while a floating keyboard is dragged is
//!   [`KeyboardFrame::Overlapping`] with [`Rect::ZERO`]; callers special-case it.
//! - Otherwise the keyboard overlaps when its intersection with the view's bounds has
//!   positive area. Frames that only touch an edge do not overlap.

use kurbo::Rect;

use crate::info::NotificationInfo;
use crate::types::{KeyboardFrame, Screen, ScreenPlacement, ViewGeometry};

/// Classify the keyboard frame in `info` relative to `view`.
///
/// Returns `None` when the view is not placed on any display, or when its placement cannot be
/// inverted.
pub fn resolve_frame<V: ViewGeometry + ?Sized>(
    info: &NotificationInfo,
    view: &V,
) -> Option<KeyboardFrame> {
    let placement = view.placement()?;
    if let Some(screen) = info.screen()
        && screen.id != placement.screen.id
    {
        return Some(KeyboardFrame::NonOverlapping);
    }

    let ending_frame = info.ending_frame();
    if ending_frame == Rect::ZERO {
        return Some(KeyboardFrame::Overlapping(Rect::ZERO));
    }

    let local = to_view_space(ending_frame, &placement)?;
    if local.intersect(view.bounds()).is_zero_area() {
        Some(KeyboardFrame::NonOverlapping)
    } else {
        Some(KeyboardFrame::Overlapping(local))
    }
}

/// Returns true if the keyboard in `info` is narrower than its hosting screen.
///
/// The hosting screen is the one the event was reported against, falling back to the
/// screen `view` is placed on. Returns `false` when neither is known.
pub fn is_floating<V: ViewGeometry + ?Sized>(info: &NotificationInfo, view: &V) -> bool {
    hosting_screen(info, view)
        .is_some_and(|screen| info.ending_frame().width() < screen.bounds.width())
}

/// The screen a keyboard frame belongs to: the event's screen, else the view's.
pub fn hosting_screen<V: ViewGeometry + ?Sized>(
    info: &NotificationInfo,
    view: &V,
) -> Option<Screen> {
    info.screen()
        .or_else(|| view.placement().map(|placement| placement.screen))
}

/// Map a screen-space rectangle into the local space of a placed view.
///
/// Returns `None` if the placement collapses the view (zero or non-finite determinant).
pub fn to_view_space(rect: Rect, placement: &ScreenPlacement) -> Option<Rect> {
    let det = placement.to_screen.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some(placement.to_screen.inverse().transform_rect_bbox(rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Affine, Vec2};

    use crate::notification::{
        ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_END_KEY, UserInfo, Value,
    };
    use crate::types::{PlacedView, ScreenId};

    const SCREEN: Screen = Screen::new(ScreenId(0), Rect::new(0.0, 0.0, 400.0, 800.0));
    const OTHER_SCREEN: Screen = Screen::new(ScreenId(1), Rect::new(0.0, 0.0, 1024.0, 768.0));

    fn info(frame: Rect, screen: Option<Screen>) -> NotificationInfo {
        let user_info = UserInfo::new()
            .with(FRAME_END_KEY, Value::Rect(frame))
            .with(ANIMATION_DURATION_KEY, Value::Float(0.25))
            .with(ANIMATION_CURVE_KEY, Value::Integer(7));
        NotificationInfo::from_user_info(&user_info, screen).unwrap()
    }

    fn windowed_view() -> PlacedView {
        PlacedView::on_screen(SCREEN.bounds, SCREEN, Affine::IDENTITY)
    }

    #[test]
    fn detached_view_has_no_frame() {
        let info = info(Rect::new(0.0, 500.0, 400.0, 800.0), Some(SCREEN));
        let view = PlacedView::detached(Rect::new(0.0, 0.0, 400.0, 800.0));
        assert_eq!(resolve_frame(&info, &view), None);
    }

    #[test]
    fn frame_below_view_does_not_overlap() {
        let info = info(Rect::new(0.0, 900.0, 400.0, 1200.0), Some(SCREEN));
        assert_eq!(
            resolve_frame(&info, &windowed_view()),
            Some(KeyboardFrame::NonOverlapping)
        );
    }

    #[test]
    fn intersecting_frame_is_returned_unclipped() {
        let frame = Rect::new(0.0, 500.0, 400.0, 800.0);
        let docked = info(frame, Some(SCREEN));
        assert_eq!(
            resolve_frame(&docked, &windowed_view()),
            Some(KeyboardFrame::Overlapping(frame))
        );

        // Extends past the bottom edge; still the full frame.
        let tall = Rect::new(0.0, 500.0, 400.0, 1100.0);
        let tall_info = info(tall, Some(SCREEN));
        assert_eq!(
            resolve_frame(&tall_info, &windowed_view()),
            Some(KeyboardFrame::Overlapping(tall))
        );
    }

    #[test]
    fn edge_contact_is_not_overlap() {
        let info = info(Rect::new(0.0, 800.0, 400.0, 1100.0), Some(SCREEN));
        assert_eq!(
            resolve_frame(&info, &windowed_view()),
            Some(KeyboardFrame::NonOverlapping)
        );
    }

    #[test]
    fn frame_is_mapped_into_view_space() {
        // A view whose origin sits at (0, 300) on screen.
        let view = PlacedView::on_screen(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            SCREEN,
            Affine::translate(Vec2::new(0.0, 300.0)),
        );
        let info = info(Rect::new(0.0, 500.0, 400.0, 800.0), Some(SCREEN));
        assert_eq!(
            resolve_frame(&info, &view),
            Some(KeyboardFrame::Overlapping(Rect::new(0.0, 200.0, 400.0, 500.0)))
        );

        // The same keyboard misses a view in the top part of the screen.
        let top =
            PlacedView::on_screen(Rect::new(0.0, 0.0, 400.0, 300.0), SCREEN, Affine::IDENTITY);
        assert_eq!(
            resolve_frame(&info, &top),
            Some(KeyboardFrame::NonOverlapping)
        );
    }

    #[test]
    fn screen_falls_back_to_view_when_event_has_none() {
        let frame = Rect::new(0.0, 500.0, 400.0, 800.0);
        let info = info(frame, None);
        assert_eq!(
            resolve_frame(&info, &windowed_view()),
            Some(KeyboardFrame::Overlapping(frame))
        );
    }

    #[test]
    fn keyboard_on_another_screen_does_not_overlap() {
        let info = info(Rect::new(0.0, 500.0, 400.0, 800.0), Some(OTHER_SCREEN));
        assert_eq!(
            resolve_frame(&info, &windowed_view()),
            Some(KeyboardFrame::NonOverlapping)
        );
    }

    #[test]
    fn zero_frame_while_dragging_is_overlapping_zero() {
        let info = info(Rect::ZERO, Some(SCREEN));
        let frame = resolve_frame(&info, &windowed_view()).unwrap();
        assert_eq!(frame, KeyboardFrame::Overlapping(Rect::ZERO));
        assert!(frame.is_hidden_while_dragging());
    }

    #[test]
    fn zero_area_frame_elsewhere_does_not_overlap() {
        let info = info(Rect::new(10.0, 400.0, 10.0, 400.0), Some(SCREEN));
        assert_eq!(
            resolve_frame(&info, &windowed_view()),
            Some(KeyboardFrame::NonOverlapping)
        );
    }

    #[test]
    fn docked_keyboard_is_not_floating() {
        let docked = info(Rect::new(0.0, 300.0, 400.0, 800.0), Some(SCREEN));
        // The event's screen is enough, even for a detached view.
        assert!(!is_floating(&docked, &PlacedView::detached(Rect::ZERO)));
    }

    #[test]
    fn narrow_keyboard_is_floating() {
        let floating = info(Rect::new(0.0, 200.0, 150.0, 700.0), Some(SCREEN));
        assert!(is_floating(&floating, &PlacedView::detached(Rect::ZERO)));
    }

    #[test]
    fn floating_uses_view_screen_as_fallback() {
        let floating = info(Rect::new(0.0, 200.0, 150.0, 700.0), None);
        assert!(is_floating(&floating, &windowed_view()));
        // No screen anywhere: cannot tell, so not floating.
        assert!(!is_floating(&floating, &PlacedView::detached(Rect::ZERO)));
    }

    #[test]
    fn rotated_placement_uses_bounding_box() {
        let placement = ScreenPlacement {
            screen: SCREEN,
            to_screen: Affine::rotate(core::f64::consts::FRAC_PI_2),
        };
        let mapped = to_view_space(Rect::new(0.0, 0.0, 10.0, 20.0), &placement).unwrap();
        assert!((mapped.width() - 20.0).abs() < 1e-9);
        assert!((mapped.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn collapsed_placement_has_no_frame() {
        let view = PlacedView::on_screen(
            Rect::new(0.0, 0.0, 400.0, 800.0),
            SCREEN,
            Affine::scale_non_uniform(1.0, 0.0),
        );
        let docked = info(Rect::new(0.0, 500.0, 400.0, 800.0), Some(SCREEN));
        assert_eq!(resolve_frame(&docked, &view), None);

        let placement = view.placement.unwrap();
        assert_eq!(to_view_space(Rect::new(0.0, 0.0, 10.0, 20.0), &placement), None);
    }
}
