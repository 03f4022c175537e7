// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard overlay.
//!
//! A console rendition of a screen with a text field and a translucent box that tracks the
//! part of the keyboard covering the view. Each frame change prints the label text and the
//! box the overlay would animate to.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_keyboard_demos --example keyboard_overlay`

use std::any::Any;
use std::rc::Rc;

use kurbo::{Affine, Rect};
use tracing_subscriber::EnvFilter;
use understory_keyboard::notification::{
    ANIMATION_CURVE_KEY, ANIMATION_DURATION_KEY, FRAME_BEGIN_KEY, FRAME_END_KEY, IS_LOCAL_KEY,
    Notification, NotificationName, UserInfo, Value,
};
use understory_keyboard::{
    AnimationCurve, KeyboardFrame, KeyboardObserver, KeyboardObserverDelegate, NotificationCenter,
    PlacedView, Screen, ScreenId,
};

const BORDER: f64 = 4.0;

struct OverlayController {
    view: PlacedView,
}

impl KeyboardObserverDelegate for OverlayController {
    fn keyboard_frame_will_change(
        &self,
        observer: &KeyboardObserver,
        animation_duration: f64,
        animation_curve: AnimationCurve,
    ) {
        let bounds = self.view.bounds;
        let hidden_target = Rect::new(0.0, bounds.y1, bounds.width(), bounds.y1);
        let (label, target, hidden) = match observer.current_frame(&self.view) {
            Some(frame @ KeyboardFrame::Overlapping(keyboard)) => {
                let label = format!(
                    "Keyboard overlapping by {}pt",
                    frame.overlap_height(bounds).round()
                );
                if frame.is_hidden_while_dragging() {
                    (label, hidden_target, true)
                } else {
                    (label, keyboard, false)
                }
            }
            Some(KeyboardFrame::NonOverlapping) => {
                ("Keyboard is not overlapping.".to_owned(), hidden_target, true)
            }
            None => ("No keyboard frame available.".to_owned(), hidden_target, true),
        };
        let floating = observer.is_keyboard_floating(&self.view);

        println!("  label:    {label}");
        println!(
            "  overlay:  {:?} hidden={hidden} floating={floating}",
            target.inflate(BORDER, BORDER)
        );
        println!(
            "  animate:  {animation_duration}s curve={animation_curve:?} (code {})",
            animation_curve.raw()
        );
    }
}

fn keyboard_event(screen: Screen, from: Rect, to: Rect) -> Notification {
    let source: Rc<dyn Any> = Rc::new(screen);
    // Only the ending frame, duration, and curve are read; the rest is platform noise.
    let user_info = UserInfo::new()
        .with(FRAME_BEGIN_KEY, Value::Rect(from))
        .with(FRAME_END_KEY, Value::Rect(to))
        .with(IS_LOCAL_KEY, Value::Bool(true))
        .with(ANIMATION_DURATION_KEY, Value::Float(0.25))
        .with(ANIMATION_CURVE_KEY, Value::Integer(7));
    Notification::new(
        NotificationName::KeyboardWillChangeFrame,
        Some(source),
        Some(user_info),
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let screen = Screen::new(ScreenId(0), Rect::new(0.0, 0.0, 400.0, 800.0));
    let center = NotificationCenter::new();
    let observer = KeyboardObserver::with_center(&center);
    let controller = Rc::new(OverlayController {
        view: PlacedView::on_screen(screen.bounds, screen, Affine::IDENTITY),
    });
    observer.add_delegate(&controller);

    let steps = [
        ("docked keyboard shown", Rect::new(0.0, 500.0, 400.0, 800.0)),
        ("same frame again (suppressed)", Rect::new(0.0, 500.0, 400.0, 800.0)),
        ("undocked to a floating panel", Rect::new(40.0, 420.0, 360.0, 640.0)),
        ("floating panel dragged", Rect::ZERO),
        ("keyboard dismissed", Rect::new(0.0, 800.0, 400.0, 1100.0)),
    ];
    let mut previous = Rect::new(0.0, 800.0, 400.0, 1100.0);
    for (step, frame) in steps {
        println!("== {step} ==");
        center.post(&keyboard_event(screen, previous, frame));
        previous = frame;
    }

    // Malformed payloads are dropped; run with RUST_LOG=debug to see why.
    center.post(&Notification::new(
        NotificationName::KeyboardDidChangeFrame,
        None,
        Some(UserInfo::new()),
    ));
}
