//! # Form options
//!
//! Everything is independently defaulted, so a form only spells out what it
//! changes:
//!
//! ```rust
//! use reform::*;
//! use reform_core::Stream;
//!
//! let scroll: Stream<f32> = Stream::new();
//! let options = FormOptions::default()
//!     .custom_submission(CustomSubmission::default().field("notes"))
//!     .hover_submit_button(
//!         HoverSubmitButton::default()
//!             .submit_button_field("actions")
//!             .border_field("bottom")
//!             .scroll_position(scroll),
//!     );
//! assert_eq!(options.hover_submit_button.hovering_class_name, "hovering");
//! ```
//!
//! `FormConfig` holds the data-only subset (keys, class name, keybindings as
//! text), e.g. when loaded from JSON with the `serde` feature.

use std::collections::BTreeSet;
use std::rc::Rc;

use reform_core::{Key, KeyChord, KeyEvent, Modifiers, Stream};

use crate::{FieldKey, FormError};

pub const DEFAULT_HOVERING_CLASS: &str = "hovering";

pub type SubmitPredicate = Rc<dyn Fn(&KeyEvent) -> bool>;

/// `Ctrl+Enter` and `Meta+Enter`.
pub fn default_submit_chords() -> Vec<KeyChord> {
    vec![
        KeyChord::new(Key::Enter, Modifiers::CTRL),
        KeyChord::new(Key::Enter, Modifiers::META),
    ]
}

/// Keyboard submission from inside selected fields.
#[derive(Clone)]
pub struct CustomSubmission {
    pub fields: BTreeSet<FieldKey>,
    pub predicate: SubmitPredicate,
}

impl Default for CustomSubmission {
    fn default() -> Self {
        Self {
            fields: BTreeSet::new(),
            predicate: chords_predicate(default_submit_chords()),
        }
    }
}

impl std::fmt::Debug for CustomSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomSubmission")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl CustomSubmission {
    pub fn field(mut self, key: impl Into<FieldKey>) -> Self {
        self.fields.insert(key.into());
        self
    }

    pub fn predicate(mut self, f: impl Fn(&KeyEvent) -> bool + 'static) -> Self {
        self.predicate = Rc::new(f);
        self
    }

    /// Accept any of `chords`.
    pub fn chords(mut self, chords: Vec<KeyChord>) -> Self {
        self.predicate = chords_predicate(chords);
        self
    }
}

fn chords_predicate(chords: Vec<KeyChord>) -> SubmitPredicate {
    Rc::new(move |ev: &KeyEvent| chords.iter().any(|c| c.matches(ev)))
}

/// Marks the submit button once it has scrolled down to the form's bottom
/// border. Inert until both fields are set.
#[derive(Clone)]
pub struct HoverSubmitButton {
    pub submit_button_field: Option<FieldKey>,
    pub border_field: Option<FieldKey>,
    pub hovering_class_name: String,
    pub scroll_position: Stream<f32>,
}

impl Default for HoverSubmitButton {
    fn default() -> Self {
        Self {
            submit_button_field: None,
            border_field: None,
            hovering_class_name: DEFAULT_HOVERING_CLASS.to_string(),
            scroll_position: Stream::never(),
        }
    }
}

impl std::fmt::Debug for HoverSubmitButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverSubmitButton")
            .field("submit_button_field", &self.submit_button_field)
            .field("border_field", &self.border_field)
            .field("hovering_class_name", &self.hovering_class_name)
            .finish_non_exhaustive()
    }
}

impl HoverSubmitButton {
    pub fn submit_button_field(mut self, key: impl Into<FieldKey>) -> Self {
        self.submit_button_field = Some(key.into());
        self
    }

    pub fn border_field(mut self, key: impl Into<FieldKey>) -> Self {
        self.border_field = Some(key.into());
        self
    }

    pub fn hovering_class_name(mut self, name: impl Into<String>) -> Self {
        self.hovering_class_name = name.into();
        self
    }

    pub fn scroll_position(mut self, scroll: Stream<f32>) -> Self {
        self.scroll_position = scroll;
        self
    }

    pub fn is_active(&self) -> bool {
        self.submit_button_field.is_some() && self.border_field.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FormOptions {
    pub custom_submission: CustomSubmission,
    pub hover_submit_button: HoverSubmitButton,
}

impl FormOptions {
    pub fn custom_submission(mut self, c: CustomSubmission) -> Self {
        self.custom_submission = c;
        self
    }

    pub fn hover_submit_button(mut self, h: HoverSubmitButton) -> Self {
        self.hover_submit_button = h;
        self
    }

    /// Option keys that name no declared field.
    pub(crate) fn undeclared_keys<'a>(
        &'a self,
        is_declared: impl Fn(&FieldKey) -> bool + 'a,
    ) -> impl Iterator<Item = &'a FieldKey> + 'a {
        let hover = &self.hover_submit_button;
        self.custom_submission
            .fields
            .iter()
            .chain(hover.submit_button_field.iter())
            .chain(hover.border_field.iter())
            .filter(move |k| !is_declared(k))
    }
}

/// Data-only form configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormConfig {
    pub submission_fields: Vec<String>,
    /// Keybindings such as `"Ctrl+Enter"`; any of them submits.
    pub submit_keys: Vec<String>,
    pub submit_button_field: Option<String>,
    pub border_field: Option<String>,
    pub hovering_class_name: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submission_fields: Vec::new(),
            submit_keys: default_submit_chords()
                .iter()
                .map(ToString::to_string)
                .collect(),
            submit_button_field: None,
            border_field: None,
            hovering_class_name: DEFAULT_HOVERING_CLASS.to_string(),
        }
    }
}

impl FormConfig {
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the keybindings and attaches the host's scroll signal.
    pub fn into_options(self, scroll_position: Stream<f32>) -> Result<FormOptions, FormError> {
        let chords = self
            .submit_keys
            .iter()
            .map(|binding| {
                binding
                    .parse::<KeyChord>()
                    .map_err(|source| FormError::InvalidKeybinding {
                        binding: binding.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let custom_submission = CustomSubmission {
            fields: self.submission_fields.into_iter().map(FieldKey::from).collect(),
            predicate: chords_predicate(chords),
        };
        let hover_submit_button = HoverSubmitButton {
            submit_button_field: self.submit_button_field.map(FieldKey::from),
            border_field: self.border_field.map(FieldKey::from),
            hovering_class_name: self.hovering_class_name,
            scroll_position,
        };
        Ok(FormOptions {
            custom_submission,
            hover_submit_button,
        })
    }
}
