use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::{FieldKey, FormDeclaration, Values};

/// Returns a human-readable message when the value is invalid, `None`
/// otherwise. Never panics to signal invalid input.
pub type Validator<V> = Rc<dyn Fn(&V) -> Option<String>>;

/// Optional validator per field. A field without one has no opinion.
pub struct ValidatorMap<V: 'static> {
    map: HashMap<FieldKey, Validator<V>>,
}

impl<V> Clone for ValidatorMap<V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<V> Default for ValidatorMap<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> std::fmt::Debug for ValidatorMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}

impl<V: 'static> ValidatorMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        key: impl Into<FieldKey>,
        f: impl Fn(&V) -> Option<String> + 'static,
    ) -> Self {
        self.insert(key, f);
        self
    }

    pub fn insert(&mut self, key: impl Into<FieldKey>, f: impl Fn(&V) -> Option<String> + 'static) {
        self.map.insert(key.into(), Rc::new(f));
    }

    pub fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&Validator<V>> {
        self.map.get(key)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Validation {
    /// One entry per declared key; `None` is valid.
    pub errors: BTreeMap<FieldKey, Option<String>>,
    pub all_valid: bool,
}

impl Validation {
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).and_then(|e| e.as_deref())
    }
}

/// Per-field errors and the aggregate flag. Keys without an entry, without a
/// validator, or without a current value are valid.
pub fn validate<V>(
    values: &Values<V>,
    validators: &ValidatorMap<V>,
    decl: &FormDeclaration<V>,
) -> Validation {
    let errors: BTreeMap<FieldKey, Option<String>> = decl
        .entries()
        .map(|(key, field)| {
            let error = field
                .and_then(|_| validators.get(key.as_str()))
                .zip(values.get(key))
                .and_then(|(validator, value)| validator(value));
            (key.clone(), error)
        })
        .collect();
    let all_valid = errors.values().all(Option::is_none);
    Validation { errors, all_valid }
}
