//! Sticky submit button: decides whether the submit row has reached the
//! bottom border of the form, re-evaluated on scroll only.

use reform_core::{Rect, Signal, Stream, signal};

use crate::{HoverSubmitButton, Isolator};

/// How far (px) above the border's bottom edge the button row counts as
/// having reached it.
pub const STICKY_THRESHOLD: f32 = 30.0;

pub fn is_reached_bottom(border: Rect, button_row: Rect) -> bool {
    border.bottom() - STICKY_THRESHOLD < button_row.top()
}

/// Sample-on-trigger: recomputes on every scroll position, using the latest
/// measurement of each anchor. Emits nothing until both have been measured.
/// Geometry changes alone never trigger.
pub fn reached_bottom(
    scroll_position: &Stream<f32>,
    border: &Stream<Rect>,
    button_row: &Stream<Rect>,
) -> Stream<bool> {
    scroll_position
        .sample_combine(border, button_row)
        .map(|(_, border, row)| is_reached_bottom(*border, *row))
}

/// The detector wired to the configured anchors. Inert (`false` forever)
/// unless both the border and the button field are configured.
pub(crate) fn reached_bottom_signal(isolator: &Isolator, hover: &HoverSubmitButton) -> Signal<bool> {
    let (Some(border_field), Some(button_field)) =
        (&hover.border_field, &hover.submit_button_field)
    else {
        return signal(false);
    };
    log::debug!("sticky submit: `{button_field}` against border `{border_field}`");

    let border = isolator.isolate(border_field).element();
    let row = isolator.isolate(button_field).element();
    reached_bottom(&hover.scroll_position, &border, &row)
        .dedupe()
        .remember(false)
}
