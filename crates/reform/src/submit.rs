use reform_core::{EventKind, Stream};

use crate::{CustomSubmission, Isolator};

/// A submission happened. Carries nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submit;

/// Native submit (default action suppressed) merged with keybind-filtered
/// keydowns of the configured fields. Nothing is deduplicated: a native submit
/// and a keybind arriving together are two submissions.
pub fn submissions(isolator: &Isolator, custom: &CustomSubmission) -> Stream<Submit> {
    let native = isolator.root().events(EventKind::Submit).map(|ev| {
        ev.prevent_default();
        log::debug!("native submit");
        Submit
    });

    let keybinds = custom.fields.iter().map(|key| {
        let predicate = custom.predicate.clone();
        let key = key.clone();
        isolator
            .isolate(&key)
            .events(EventKind::KeyDown)
            .filter_map(move |ev| {
                let hit = ev.key().is_some_and(|k| predicate(k));
                if hit {
                    log::debug!("keybind submit from `{key}`");
                }
                hit.then_some(Submit)
            })
    });

    Stream::merge_all(std::iter::once(native).chain(keybinds))
}
