//! # Reform
//!
//! Builds one reactive form out of a static declaration of named fields.
//! Each field brings its own view and its own update logic; the form
//! scopes their events, merges their updates, tracks which fields were
//! touched, validates, and decides when the form was submitted.
//!
//! ```rust
//! use std::rc::Rc;
//! use reform::*;
//! use reform_core::widgets::{Column, TextField};
//! use reform_core::*;
//!
//! let name = Field::new(
//!     |input: FieldInput<String>, _| TextField(input.value, "Name"),
//!     |source: Rc<dyn EventSource>| {
//!         source.events(EventKind::Input).filter_map(|ev| {
//!             let text = ev.text()?.to_string();
//!             Some(Endo::new(move |_: String| text.clone()))
//!         })
//!     },
//! );
//! let decl = FormDeclaration::new().field("name", name);
//!
//! let hub = EventHub::new();
//! let values = signal(Values::from([("name".into(), String::new())]));
//! let render = signal(renderer(|views| {
//!     Column(Modifier::new()).with_children(views.into_values().flatten().collect())
//! }));
//!
//! let form = Form::new(
//!     decl,
//!     FormInputs::new(hub.isolating(), values.clone(), render),
//!     FormOptions::default(),
//! )
//! .unwrap();
//! form.reducer().apply_to(&values);
//!
//! hub.dispatch(DomEvent::new(EventKind::Input, EventPayload::Text("Ann".into())).at("name"));
//! assert_eq!(values.get()["name"], "Ann");
//! assert!(form.touched().is_touched("name"));
//! assert!(form.view().get().to_markup().contains(r#"value="Ann""#));
//! ```
//!
//! The caller owns the values: the form only proposes updates through
//! [`Form::reducer`] and re-renders whenever the values signal changes.

pub mod compose;
pub mod error;
pub mod field;
pub mod form;
pub mod isolate;
pub mod options;
pub mod reducer;
pub mod sticky;
pub mod submit;
pub mod tests;
pub mod touch;
pub mod validate;
pub mod value;

pub use compose::*;
pub use error::*;
pub use field::*;
pub use form::*;
pub use isolate::*;
pub use options::*;
pub use reducer::*;
pub use sticky::*;
pub use submit::*;
pub use touch::*;
pub use validate::*;
pub use value::*;
