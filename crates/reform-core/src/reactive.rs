use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: RefCell<Option<ObserverId>> = const { RefCell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
    static NEXT_SIGNAL: Cell<SignalId> = const { Cell::new(0) };
}

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    // signal_id -> observers that depend on it
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer_id -> signals it depends on
    back: HashMap<ObserverId, HashSet<SignalId>>,
    // recompute closures
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
    // inputs changed while running; rerun once the current pass returns
    dirty: HashSet<ObserverId>,
}

impl DepGraph {
    fn remove_all_edges_for(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for s in signals {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                }
            }
        }
    }
    fn remove_observer(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.remove_all_edges_for(obs);
        self.running.remove(&obs);
        self.dirty.remove(&obs);
    }
}

pub fn next_signal_id() -> SignalId {
    NEXT_SIGNAL.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

pub fn register_signal_read(sig: SignalId) {
    CURRENT_OBSERVER.with(|co| {
        if let Some(obs) = *co.borrow() {
            GRAPH.with(|g| {
                let mut g = g.borrow_mut();
                g.edges.entry(sig).or_default().insert(obs);
                g.back.entry(obs).or_default().insert(sig);
            });
        }
    });
}

/// Recompute every observer that read `sig` during its last run.
pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        let g = g.borrow();
        let mut dependents: Vec<ObserverId> = g
            .edges
            .get(&sig)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        // creation order keeps recomputation deterministic
        dependents.sort_unstable();
        dependents.into()
    });
    while let Some(obs) = queue.pop_front() {
        run_tracked(obs);
    }
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges.
pub fn remove_observer(id: ObserverId) {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        g.remove_observer(id);
    });
}

/// Runs `f` as observer `obs`, replacing its recorded dependencies.
pub fn track<R>(obs: ObserverId, f: impl FnOnce() -> R) -> R {
    GRAPH.with(|g| g.borrow_mut().remove_all_edges_for(obs));
    let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().replace(obs));
    let out = f();
    CURRENT_OBSERVER.with(|co| *co.borrow_mut() = prev);
    out
}

pub fn observer_count() -> usize {
    GRAPH.with(|g| g.borrow().observers.len())
}

/// Runs `f` without registering any signal reads against the current observer.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().take());
    let out = f();
    CURRENT_OBSERVER.with(|co| *co.borrow_mut() = prev);
    out
}

fn run_tracked(obs: ObserverId) {
    let f = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        // its inputs may already have been read by the running pass
        if g.running.contains(&obs) {
            g.dirty.insert(obs);
            return None;
        }
        let f = g.observers.get(&obs).cloned()?;
        g.running.insert(obs);
        Some(f)
    });
    let Some(f) = f else {
        return;
    };

    loop {
        GRAPH.with(|g| g.borrow_mut().remove_all_edges_for(obs));
        let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().replace(obs));
        f();
        CURRENT_OBSERVER.with(|co| *co.borrow_mut() = prev);

        let again = GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            g.dirty.remove(&obs) && g.observers.contains_key(&obs)
        });
        if !again {
            break;
        }
        log::trace!("observer {obs} changed while running; recomputing");
    }

    GRAPH.with(|g| {
        g.borrow_mut().running.remove(&obs);
    });
}
