use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use reform_core::{Endo, EventSource, ScopeId, Stream, View};

use crate::error::FormError;

/// Names one declared field. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(Rc<str>);

impl FieldKey {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Rc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scope identity of this field's subtree and events.
    pub fn scope(&self) -> ScopeId {
        ScopeId::new(&*self.0)
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        FieldKey::new(s)
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        FieldKey::new(s)
    }
}

impl std::borrow::Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldKey {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldKey {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(FieldKey::from)
    }
}

/// Current value of every declared field, keyed by field.
pub type Values<V> = BTreeMap<FieldKey, V>;

/// What a field's view is rendered from.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInput<V> {
    pub value: V,
    /// `None` means valid (or no validator registered).
    pub error: Option<String>,
    pub touched: bool,
}

/// Form-wide facts every field view may depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormStatus {
    pub valid: bool,
}

pub type FieldView<V> = Rc<dyn Fn(FieldInput<V>, FormStatus) -> View>;

/// Maps a field's event source to its stream of local updates. Called once,
/// when the form is built.
pub type Intent<V> = Rc<dyn Fn(Rc<dyn EventSource>) -> Stream<Endo<V>>>;

pub struct Field<V: 'static> {
    pub view: FieldView<V>,
    pub intent: Intent<V>,
    /// When false the intent receives the unscoped, whole-form source.
    pub should_isolate: bool,
}

impl<V> Clone for Field<V> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            intent: self.intent.clone(),
            should_isolate: self.should_isolate,
        }
    }
}

impl<V: 'static> Field<V> {
    pub fn new(
        view: impl Fn(FieldInput<V>, FormStatus) -> View + 'static,
        intent: impl Fn(Rc<dyn EventSource>) -> Stream<Endo<V>> + 'static,
    ) -> Self {
        Self {
            view: Rc::new(view),
            intent: Rc::new(intent),
            should_isolate: true,
        }
    }

    /// A field that renders but never proposes updates.
    pub fn display(view: impl Fn(FieldInput<V>, FormStatus) -> View + 'static) -> Self {
        Self::new(view, |_| Stream::never())
    }

    pub fn isolated(mut self, should_isolate: bool) -> Self {
        self.should_isolate = should_isolate;
        self
    }
}

/// The static list of fields a form is built from, in declaration order.
///
/// A key declared with [`slot`](Self::slot) has no entry: it renders nothing,
/// never errs and is never touched, but its value still passes through.
pub struct FormDeclaration<V: 'static> {
    entries: Vec<(FieldKey, Option<Field<V>>)>,
}

impl<V> Default for FormDeclaration<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: 'static> FormDeclaration<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<FieldKey>, field: Field<V>) -> Self {
        self.entries.push((key.into(), Some(field)));
        self
    }

    pub fn slot(mut self, key: impl Into<FieldKey>) -> Self {
        self.entries.push((key.into(), None));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&FieldKey, Option<&Field<V>>)> {
        self.entries.iter().map(|(k, f)| (k, f.as_ref()))
    }

    /// Keys with a present entry.
    pub fn present(&self) -> impl Iterator<Item = (&FieldKey, &Field<V>)> {
        self.entries
            .iter()
            .filter_map(|(k, f)| f.as_ref().map(|f| (k, f)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_str() == key)
    }

    pub fn get(&self, key: &str) -> Option<&Field<V>> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .and_then(|(_, f)| f.as_ref())
    }

    pub(crate) fn check(&self) -> Result<(), FormError> {
        let mut seen = HashSet::new();
        for key in self.keys() {
            if !seen.insert(key) {
                return Err(FormError::DuplicateField(key.clone()));
            }
        }
        Ok(())
    }
}
