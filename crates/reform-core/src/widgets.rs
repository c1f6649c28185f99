#![allow(non_snake_case)]
//! View constructors.

use crate::{Modifier, View, ViewKind};

pub fn Form(modifier: Modifier) -> View {
    View::new(ViewKind::Form).modifier(modifier)
}

pub fn Box(modifier: Modifier) -> View {
    View::new(ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(text: impl Into<String>) -> View {
    View::new(ViewKind::Button { text: text.into() })
}

pub fn TextField(value: impl Into<String>, hint: impl Into<String>) -> View {
    View::new(ViewKind::TextField {
        value: value.into(),
        hint: hint.into(),
    })
}

pub fn Checkbox(checked: bool, label: impl Into<String>) -> View {
    View::new(ViewKind::Checkbox {
        checked,
        label: label.into(),
    })
}
