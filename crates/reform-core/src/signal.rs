use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};

use crate::effects::{Dispose, register_in_scope};
use crate::reactive::{self, SignalId};
use crate::stream::Stream;

new_key_type! {
    pub struct SubId;
}

/// Remembered, observable value. Late readers always see the latest value.
pub struct Signal<T: 'static>(Rc<Inner<T>>);

struct Inner<T> {
    id: SignalId,
    value: RefCell<T>,
    subs: RefCell<SlotMap<SubId, Rc<dyn Fn(&T)>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&*self.0.value.borrow()).finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            id: reactive::next_signal_id(),
            value: RefCell::new(value),
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    pub fn id(&self) -> SignalId {
        self.0.id
    }

    /// Reads the value, registering a dependency when called from an observer.
    pub fn get(&self) -> T {
        reactive::register_signal_read(self.0.id);
        self.0.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T {
        self.0.value.borrow().clone()
    }

    pub fn set(&self, v: T) {
        *self.0.value.borrow_mut() = v;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Dispose {
        let id = self.0.subs.borrow_mut().insert(Rc::new(f));
        let weak: Weak<Inner<T>> = Rc::downgrade(&self.0);
        let d = Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subs.borrow_mut().remove(id);
            }
        });
        register_in_scope(&d);
        d
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    /// Every subsequent value as an event stream.
    pub fn changes(&self) -> Stream<T> {
        let out = Stream::new();
        let tx = out.clone();
        self.subscribe(move |v| tx.emit(v.clone()));
        out
    }

    fn notify(&self) {
        // snapshot both so subscribers may write back into this signal
        let v = self.0.value.borrow().clone();
        let subs: Vec<Rc<dyn Fn(&T)>> = self.0.subs.borrow().values().cloned().collect();
        for s in subs {
            s(&v);
        }
        reactive::signal_changed(self.0.id);
    }
}

pub fn signal<T: Clone + 'static>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// Combine-latest: recomputes `compute` whenever any signal it read last
/// time changes, always using the latest value of each.
///
/// The observer is removed when the current scope is disposed.
pub fn derived<T: Clone + 'static>(compute: impl Fn() -> T + 'static) -> Signal<T> {
    let compute = Rc::new(compute);
    let slot: Rc<RefCell<Option<Signal<T>>>> = Rc::new(RefCell::new(None));
    let obs = reactive::new_observer({
        let slot = slot.clone();
        let compute = compute.clone();
        move || {
            let v = compute();
            let out = slot.borrow().clone();
            if let Some(out) = out {
                out.set(v);
            }
        }
    });

    // Initial compute under tracking to establish dependencies
    let out = Signal::new(reactive::track(obs, || compute()));
    *slot.borrow_mut() = Some(out.clone());
    register_in_scope(&Dispose::new(move || reactive::remove_observer(obs)));
    out
}
