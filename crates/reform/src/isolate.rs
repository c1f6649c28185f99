use std::rc::Rc;

use reform_core::{EventSource, HostSource, IsolatingSource, IsolationTag};

use crate::FieldKey;

/// Scoped access to the host source, chosen once from the host's
/// capabilities.
#[derive(Clone)]
pub enum Isolator {
    Scoped(Rc<dyn IsolatingSource>),
    /// Host cannot isolate: every field sees the whole form's events.
    Passthrough(Rc<dyn EventSource>),
}

impl Isolator {
    pub fn new(host: &HostSource) -> Self {
        match host {
            HostSource::Isolating(s) => Isolator::Scoped(s.clone()),
            HostSource::Plain(s) => {
                log::warn!("host event source cannot isolate; fields will share unscoped events");
                Isolator::Passthrough(s.clone())
            }
        }
    }

    pub fn root(&self) -> Rc<dyn EventSource> {
        match self {
            Isolator::Scoped(s) => s.clone(),
            Isolator::Passthrough(s) => s.clone(),
        }
    }

    pub fn isolate(&self, key: &FieldKey) -> Rc<dyn EventSource> {
        match self {
            Isolator::Scoped(s) => s.isolate(&key.scope()),
            Isolator::Passthrough(s) => s.clone(),
        }
    }

    /// The source a field's intent receives.
    pub fn source_for(&self, key: &FieldKey, should_isolate: bool) -> Rc<dyn EventSource> {
        if should_isolate {
            self.isolate(key)
        } else {
            self.root()
        }
    }
}

pub fn isolation_tag(key: &FieldKey) -> IsolationTag {
    IsolationTag::new(key.scope())
}
