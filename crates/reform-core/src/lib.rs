//! # Signals, streams and scopes
//!
//! Reform composes forms out of a small push-based reactive core. There are
//! three main pieces:
//!
//! - `Signal<T>`: remembered, observable value. Late readers see the latest.
//! - `Stream<T>`: hot, unbounded sequence of events.
//! - `Scope`: owner of subscriptions; disposing it tears the wiring down.
//!
//! ## Signals
//!
//! ```rust
//! use reform_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Reads participate in a dependency graph: `get()` inside `derived` records
//! the dependency, and future writes recompute the derived value.
//!
//! ## Derived state (combine-latest)
//!
//! ```rust
//! use reform_core::*;
//!
//! let first = signal("Jane".to_string());
//! let last = signal("Doe".to_string());
//!
//! let full = derived({
//!     let first = first.clone();
//!     let last = last.clone();
//!     move || format!("{} {}", first.get(), last.get())
//! });
//! assert_eq!(full.get(), "Jane Doe");
//!
//! last.set("Roe".to_string());
//! assert_eq!(full.get(), "Jane Roe");
//! ```
//!
//! ## Streams (sample-on-trigger)
//!
//! `Stream::sample_combine` recomputes only when its trigger fires, pairing it
//! with the latest value of the other inputs. See [`stream`] for the operator
//! set.
//!
//! ## Scopes
//!
//! Subscriptions and derived signals created inside `scope.run(..)` are
//! registered with that scope and cleaned up by `scope.dispose()` (or when the
//! last handle to the scope is dropped).

pub mod effects;
pub mod endo;
pub mod geometry;
pub mod input;
pub mod modifier;
pub mod reactive;
pub mod scope;
pub mod signal;
pub mod source;
pub mod stream;
pub mod view;
pub mod widgets;

pub use effects::*;
pub use endo::*;
pub use geometry::*;
pub use input::*;
pub use modifier::*;
pub use reactive::untracked;
pub use scope::{Scope, current_scope};
pub use signal::*;
pub use source::*;
pub use stream::*;
pub use view::*;
