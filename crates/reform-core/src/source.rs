//! # Event sources
//!
//! The host hands a form one event/geometry source for the region it renders
//! into. Every source supports unscoped access ([`EventSource`]); some also
//! support scoped access ([`IsolatingSource`]), restricting events and geometry
//! to the subtree tagged with one [`ScopeId`].
//!
//! Which capability a host has is decided once, when it is wrapped in a
//! [`HostSource`], never per call.
//!
//! [`EventHub`] is an in-process host: the platform layer (or a test) pushes
//! events and measurements into it and it routes them by target scope.
//!
//! ```rust
//! use reform_core::*;
//!
//! let hub = EventHub::new();
//! let notes = hub.isolate(&ScopeId::new("notes"));
//! let seen = notes.events(EventKind::Focus).hold();
//!
//! hub.dispatch(DomEvent::new(EventKind::Focus, EventPayload::None).at("title"));
//! assert!(seen.get().is_none());
//!
//! hub.dispatch(DomEvent::new(EventKind::Focus, EventPayload::None).at("notes"));
//! assert!(seen.get().is_some());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{DomEvent, EventKind, Rect, ScopeId, Stream};

pub trait EventSource {
    fn events(&self, kind: EventKind) -> Stream<DomEvent>;
    /// Geometry readings of the element this source is scoped to.
    fn element(&self) -> Stream<Rect>;
}

pub trait IsolatingSource: EventSource {
    fn isolate(&self, scope: &ScopeId) -> Rc<dyn EventSource>;
}

#[derive(Clone)]
pub enum HostSource {
    Isolating(Rc<dyn IsolatingSource>),
    Plain(Rc<dyn EventSource>),
}

impl HostSource {
    pub fn root(&self) -> Rc<dyn EventSource> {
        match self {
            HostSource::Isolating(s) => s.clone(),
            HostSource::Plain(s) => s.clone(),
        }
    }

    pub fn can_isolate(&self) -> bool {
        matches!(self, HostSource::Isolating(_))
    }
}

impl std::fmt::Debug for HostSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostSource::Isolating(_) => f.write_str("HostSource::Isolating"),
            HostSource::Plain(_) => f.write_str("HostSource::Plain"),
        }
    }
}

#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    events: HashMap<(Option<ScopeId>, EventKind), Stream<DomEvent>>,
    geometry: HashMap<Option<ScopeId>, Stream<Rect>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// This hub with scoped access.
    pub fn isolating(&self) -> HostSource {
        HostSource::Isolating(Rc::new(self.clone()))
    }

    /// This hub without the isolation capability.
    pub fn plain(&self) -> HostSource {
        HostSource::Plain(Rc::new(self.clone()))
    }

    fn channel(&self, scope: Option<&ScopeId>, kind: EventKind) -> Stream<DomEvent> {
        self.inner
            .borrow_mut()
            .events
            .entry((scope.cloned(), kind))
            .or_default()
            .clone()
    }

    fn geometry_channel(&self, scope: Option<&ScopeId>) -> Stream<Rect> {
        self.inner
            .borrow_mut()
            .geometry
            .entry(scope.cloned())
            .or_default()
            .clone()
    }

    /// Delivers to listeners of the event's target scope, then to unscoped
    /// listeners. Channels left behind by disposed listeners are dropped first.
    pub fn dispatch(&self, event: DomEvent) {
        log::trace!(
            "dispatch {} to {}",
            event.kind.as_str(),
            event.target.as_ref().map_or("<root>", |s| s.as_str())
        );
        self.prune();
        let (scoped, root) = {
            let inner = self.inner.borrow();
            let scoped = event
                .target
                .as_ref()
                .and_then(|scope| inner.events.get(&(Some(scope.clone()), event.kind)))
                .cloned();
            (scoped, inner.events.get(&(None, event.kind)).cloned())
        };
        if let Some(scoped) = scoped {
            scoped.emit(event.clone());
        }
        if let Some(root) = root {
            root.emit(event);
        }
    }

    /// Reports a fresh measurement of the element tagged with `scope`
    /// (`None` for the form root).
    pub fn report_geometry(&self, scope: Option<&ScopeId>, rect: Rect) {
        self.prune();
        let ch = self.inner.borrow().geometry.get(&scope.cloned()).cloned();
        if let Some(ch) = ch {
            ch.emit(rect);
        }
    }

    /// Live event and geometry channels.
    pub fn channel_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.events.len() + inner.geometry.len()
    }

    fn prune(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.events.retain(|_, s| !s.is_unused());
        inner.geometry.retain(|_, s| !s.is_unused());
    }

    pub fn isolate(&self, scope: &ScopeId) -> Rc<dyn EventSource> {
        Rc::new(ScopedHub {
            hub: self.clone(),
            scope: scope.clone(),
        })
    }
}

impl EventSource for EventHub {
    fn events(&self, kind: EventKind) -> Stream<DomEvent> {
        self.channel(None, kind)
    }

    fn element(&self) -> Stream<Rect> {
        self.geometry_channel(None)
    }
}

impl IsolatingSource for EventHub {
    fn isolate(&self, scope: &ScopeId) -> Rc<dyn EventSource> {
        EventHub::isolate(self, scope)
    }
}

struct ScopedHub {
    hub: EventHub,
    scope: ScopeId,
}

impl EventSource for ScopedHub {
    fn events(&self, kind: EventKind) -> Stream<DomEvent> {
        self.hub.channel(Some(&self.scope), kind)
    }

    fn element(&self) -> Stream<Rect> {
        self.hub.geometry_channel(Some(&self.scope))
    }
}
