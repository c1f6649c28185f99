//! "Has this field ever been interacted with" latch, per form instance.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use reform_core::{EventKind, Stream};
use web_time::Instant;

use crate::{FieldKey, FormDeclaration, Isolator};

/// Events that mark a field as touched.
pub const TOUCH_EVENTS: [EventKind; 3] = [EventKind::Change, EventKind::Focus, EventKind::Input];

/// Set of touched field keys, owned by exactly one form.
///
/// Written only by interaction events and the untouch stream wired in
/// [`watch`](Self::watch); everything else reads it.
#[derive(Clone, Default)]
pub struct TouchTracker {
    touched: Rc<RefCell<BTreeMap<FieldKey, Instant>>>,
}

impl std::fmt::Debug for TouchTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.touched.borrow().keys()).finish()
    }
}

impl TouchTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.borrow().contains_key(key)
    }

    pub fn touched_keys(&self) -> Vec<FieldKey> {
        self.touched.borrow().keys().cloned().collect()
    }

    /// When the first interaction since the last untouch happened.
    pub fn touched_at(&self, key: &str) -> Option<Instant> {
        self.touched.borrow().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.touched.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.touched.borrow().is_empty()
    }

    /// Latches `key`; later events leave the first timestamp alone.
    fn touch(&self, key: &FieldKey) {
        let mut touched = self.touched.borrow_mut();
        if !touched.contains_key(key) {
            log::trace!("field `{key}` touched");
            touched.insert(key.clone(), Instant::now());
        }
    }

    /// `None` clears every key.
    fn untouch(&self, key: Option<&FieldKey>) {
        let mut touched = self.touched.borrow_mut();
        match key {
            Some(key) => {
                log::debug!("untouch `{key}`");
                touched.remove(key);
            }
            None => {
                log::debug!("untouch all ({} keys)", touched.len());
                touched.clear();
            }
        }
    }

    /// Subscribes to change/focus/input on every present field's isolated
    /// source, and to the external untouch stream.
    pub(crate) fn watch<V>(
        &self,
        decl: &FormDeclaration<V>,
        isolator: &Isolator,
        untouch: &Stream<Option<FieldKey>>,
    ) {
        for (key, _) in decl.present() {
            let source = isolator.isolate(key);
            let interactions =
                Stream::merge_all(TOUCH_EVENTS.iter().map(|kind| source.events(*kind)));
            let tracker = self.clone();
            let key = key.clone();
            interactions.subscribe(move |_| tracker.touch(&key));
        }

        let tracker = self.clone();
        untouch.subscribe(move |key| tracker.untouch(key.as_ref()));
    }
}
