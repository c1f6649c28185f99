//! Field-local updates lifted into whole-form updates.
//!
//! Every present field's intent yields `Endo<V>` over its own value. Each is
//! lifted to an `Endo<Values<V>>` that rewrites only that field's entry, and
//! all lifted streams are merged into the form's single update channel.

use reform_core::{Endo, Stream};

use crate::{FieldKey, FormDeclaration, Isolator, Values};

/// Evolves one field: applies `endo` to `key`'s entry and leaves every other
/// entry untouched. A missing entry stays missing.
pub fn lift<V: 'static>(key: FieldKey, endo: Endo<V>) -> Endo<Values<V>> {
    Endo::new(move |mut values: Values<V>| {
        if let Some(v) = values.remove(&key) {
            values.insert(key.clone(), endo.apply(v));
        }
        values
    })
}

/// Calls every present field's intent once and merges the lifted results in
/// arrival order.
pub fn reducers<V: 'static>(
    decl: &FormDeclaration<V>,
    isolator: &Isolator,
) -> Stream<Endo<Values<V>>> {
    let lifted = decl.present().map(|(key, field)| {
        log::debug!(
            "wiring intent for `{key}` ({})",
            if field.should_isolate { "isolated" } else { "unscoped" }
        );
        let source = isolator.source_for(key, field.should_isolate);
        let key = key.clone();
        (field.intent)(source).map(move |endo| lift(key.clone(), endo.clone()))
    });
    Stream::merge_all(lifted)
}
