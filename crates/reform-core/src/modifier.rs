use smallvec::SmallVec;

use crate::view::IsolationTag;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Modifier {
    pub classes: SmallVec<[String; 2]>,
    /// Scope tags; events inside this subtree belong to these scopes.
    pub isolation: SmallVec<[IsolationTag; 1]>,
    pub disabled: bool,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.add_class(name);
        self
    }

    /// Idempotent: adding a class twice keeps one copy.
    pub fn add_class(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_class(&name) {
            self.classes.push(name);
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn isolate(mut self, tag: IsolationTag) -> Self {
        if !self.isolation.contains(&tag) {
            self.isolation.push(tag);
        }
        self
    }

    pub fn is_isolated(&self) -> bool {
        !self.isolation.is_empty()
    }
}
