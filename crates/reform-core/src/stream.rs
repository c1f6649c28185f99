//! # Streams
//!
//! `Stream<T>` is a hot, push-based, unbounded sequence of events. Emission is
//! synchronous: `emit` runs every subscriber before returning, in subscription
//! order. There is no buffering and no replay; subscribe before the producer
//! starts emitting.
//!
//! Operators (`map`, `filter`, `merge_all`, `sample_combine`, ...) subscribe to
//! their upstream immediately and return a new stream. Their upstream
//! subscriptions belong to the current [`Scope`](crate::scope::Scope), so a
//! whole graph built inside `scope.run(..)` is torn down with the scope.
//!
//! ```rust
//! use reform_core::*;
//!
//! let clicks: Stream<u32> = Stream::new();
//! let doubled = clicks.map(|n| n * 2);
//! let last = doubled.hold();
//!
//! clicks.emit(21);
//! assert_eq!(last.get(), Some(42));
//! ```
//!
//! Streams become signals with `hold` / `remember`, and signals become streams
//! with [`Signal::changes`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::SlotMap;

use crate::effects::{Dispose, register_in_scope};
use crate::endo::Endo;
use crate::signal::{Signal, SubId};

pub struct Stream<T: 'static>(Rc<StreamInner<T>>);

struct StreamInner<T> {
    subs: RefCell<SlotMap<SubId, Rc<dyn Fn(&T)>>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("subscribers", &self.0.subs.borrow().len())
            .finish()
    }
}

impl<T: 'static> Stream<T> {
    pub fn new() -> Self {
        Self(Rc::new(StreamInner {
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    /// A stream nobody emits into.
    pub fn never() -> Self {
        Self::new()
    }

    pub fn emit(&self, v: T) {
        let subs: Vec<Rc<dyn Fn(&T)>> = self.0.subs.borrow().values().cloned().collect();
        for s in subs {
            s(&v);
        }
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Dispose {
        let id = self.0.subs.borrow_mut().insert(Rc::new(f));
        let weak: Weak<StreamInner<T>> = Rc::downgrade(&self.0);
        let d = Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subs.borrow_mut().remove(id);
            }
        });
        register_in_scope(&d);
        d
    }

    /// Nobody subscribes to it and nobody else holds a handle.
    pub(crate) fn is_unused(&self) -> bool {
        Rc::strong_count(&self.0) == 1 && self.0.subs.borrow().is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        let out = Stream::new();
        let tx = out.clone();
        self.subscribe(move |v| tx.emit(f(v)));
        out
    }

    pub fn filter_map<U: 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Stream<U> {
        let out = Stream::new();
        let tx = out.clone();
        self.subscribe(move |v| {
            if let Some(u) = f(v) {
                tx.emit(u);
            }
        });
        out
    }
}

impl<T: Clone + 'static> Stream<T> {
    pub fn filter(&self, keep: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        self.filter_map(move |v| keep(v).then(|| v.clone()))
    }

    pub fn merge(&self, other: &Stream<T>) -> Stream<T> {
        Stream::merge_all([self.clone(), other.clone()])
    }

    /// Interleaves every input in arrival order. Each input keeps its own
    /// relative order; nothing else is guaranteed across inputs.
    pub fn merge_all(streams: impl IntoIterator<Item = Stream<T>>) -> Stream<T> {
        let out = Stream::new();
        for s in streams {
            let tx = out.clone();
            s.subscribe(move |v: &T| tx.emit(v.clone()));
        }
        out
    }

    /// Drops consecutive repeats.
    pub fn dedupe(&self) -> Stream<T>
    where
        T: PartialEq,
    {
        let last: RefCell<Option<T>> = RefCell::new(None);
        self.filter_map(move |v| {
            let mut last = last.borrow_mut();
            if last.as_ref() == Some(v) {
                return None;
            }
            *last = Some(v.clone());
            Some(v.clone())
        })
    }

    /// Remembers the latest event; `None` until the first one.
    pub fn hold(&self) -> Signal<Option<T>> {
        let out = Signal::new(None);
        let tx = out.clone();
        self.subscribe(move |v| tx.set(Some(v.clone())));
        out
    }

    /// Remembers the latest event, starting from `initial`.
    pub fn remember(&self, initial: T) -> Signal<T> {
        let out = Signal::new(initial);
        let tx = out.clone();
        self.subscribe(move |v| tx.set(v.clone()));
        out
    }

    /// Running accumulation, starting from `initial`.
    pub fn fold<U: Clone + 'static>(&self, initial: U, f: impl Fn(U, &T) -> U + 'static) -> Signal<U> {
        let out = Signal::new(initial);
        let tx = out.clone();
        self.subscribe(move |v| {
            let next = f(tx.get_untracked(), v);
            tx.set(next);
        });
        out
    }

    /// Sample-on-trigger: emits only when `self` fires, paired with the
    /// latest values of `a` and `b`. Until both have produced at least one
    /// value, triggers are dropped.
    pub fn sample_combine<A, B>(&self, a: &Stream<A>, b: &Stream<B>) -> Stream<(T, A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
    {
        let latest_a: Rc<RefCell<Option<A>>> = Rc::new(RefCell::new(None));
        let latest_b: Rc<RefCell<Option<B>>> = Rc::new(RefCell::new(None));
        {
            let latest_a = latest_a.clone();
            a.subscribe(move |v| *latest_a.borrow_mut() = Some(v.clone()));
        }
        {
            let latest_b = latest_b.clone();
            b.subscribe(move |v| *latest_b.borrow_mut() = Some(v.clone()));
        }
        self.filter_map(move |t| {
            let a = latest_a.borrow().clone()?;
            let b = latest_b.borrow().clone()?;
            Some((t.clone(), a, b))
        })
    }
}

impl<T: Clone + 'static> Stream<Endo<T>> {
    /// Applies every update to `target` as it arrives.
    pub fn apply_to(&self, target: &Signal<T>) -> Dispose {
        let target = target.clone();
        self.subscribe(move |endo| {
            let next = endo.apply(target.get_untracked());
            target.set(next);
        })
    }
}
