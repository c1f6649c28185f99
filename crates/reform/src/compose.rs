//! Builds the form's rendered tree from values, validation, touch state and
//! the caller's renderer. Layout is entirely the renderer's business.

use std::collections::BTreeMap;
use std::rc::Rc;

use reform_core::View;

use crate::isolate::isolation_tag;
use crate::validate::{ValidatorMap, validate};
use crate::{FieldInput, FieldKey, FormDeclaration, FormStatus, TouchTracker, Values};

/// One entry per declared key; `None` for keys without an entry.
pub type ViewsByKey = BTreeMap<FieldKey, Option<View>>;

pub type Renderer = Rc<dyn Fn(ViewsByKey) -> View>;

pub fn renderer(f: impl Fn(ViewsByKey) -> View + 'static) -> Renderer {
    Rc::new(f)
}

/// Submit-button subtree to mark with the hovering class.
#[derive(Clone, Copy, Debug)]
pub struct Stuck<'a> {
    pub field: &'a FieldKey,
    pub class_name: &'a str,
}

/// Tags `view` with `key`'s scope unless it already carries isolation tags,
/// and keys it by the tag's serialized form unless it already has a key.
pub fn tag_subtree(mut view: View, key: &FieldKey) -> View {
    let tag = match view.modifier.isolation.first() {
        Some(existing) => existing.clone(),
        None => {
            let tag = isolation_tag(key);
            view.modifier.isolation.push(tag.clone());
            tag
        }
    };
    if view.key.is_none() {
        view.key = Some(tag.serialized());
    }
    view
}

pub fn compose_view<V: Clone>(
    decl: &FormDeclaration<V>,
    values: &Values<V>,
    validators: &ValidatorMap<V>,
    touched: &TouchTracker,
    stuck: Option<Stuck<'_>>,
    renderer: &Renderer,
) -> View {
    let validation = validate(values, validators, decl);
    let status = FormStatus {
        valid: validation.all_valid,
    };
    log::trace!(
        "compose {} fields (valid: {}, stuck: {})",
        decl.len(),
        status.valid,
        stuck.is_some()
    );

    let views: ViewsByKey = decl
        .entries()
        .map(|(key, field)| {
            let Some(field) = field else {
                return (key.clone(), None);
            };
            let Some(value) = values.get(key) else {
                log::warn!("no value for declared field `{key}`; skipping its subtree");
                return (key.clone(), None);
            };

            let input = FieldInput {
                value: value.clone(),
                error: validation.error(key.as_str()).map(str::to_owned),
                touched: touched.is_touched(key.as_str()),
            };
            let mut view = (field.view)(input, status);
            if let Some(stuck) = stuck
                && stuck.field == key
            {
                view.modifier.add_class(stuck.class_name);
            }
            (key.clone(), Some(tag_subtree(view, key)))
        })
        .collect();

    renderer(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use reform_core::widgets::{Button, Column, Text, TextField};
    use reform_core::{IsolationTag, Modifier, ScopeId};

    fn decl() -> FormDeclaration<String> {
        FormDeclaration::new()
            .field(
                "name",
                Field::display(|input: FieldInput<String>, _| {
                    let mut col = Column(Modifier::new()).child(TextField(input.value, "Name"));
                    if input.touched
                        && let Some(err) = input.error
                    {
                        col = col.child(Text(err));
                    }
                    col
                }),
            )
            .field(
                "submit",
                Field::display(|_: FieldInput<String>, status| {
                    Button("Send").modifier(Modifier::new().disabled(!status.valid))
                }),
            )
            .slot("footer")
    }

    fn values(name: &str) -> Values<String> {
        Values::from([
            ("name".into(), name.to_string()),
            ("submit".into(), String::new()),
            ("footer".into(), String::new()),
        ])
    }

    fn column_renderer() -> Renderer {
        renderer(|mut views| {
            let mut root = Column(Modifier::new());
            for key in ["name", "submit", "footer"] {
                if let Some(Some(v)) = views.remove(key) {
                    root = root.child(v);
                }
            }
            root
        })
    }

    fn required() -> ValidatorMap<String> {
        ValidatorMap::new().with("name", |v: &String| {
            v.is_empty().then(|| "Required".to_string())
        })
    }

    #[test]
    fn one_tagged_subtree_per_present_field() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
        let capture = {
            let seen = seen.clone();
            renderer(move |views| {
                *seen.borrow_mut() = Some(views.clone());
                Column(Modifier::new())
            })
        };
        compose_view(
            &decl(),
            &values("Ann"),
            &ValidatorMap::new(),
            &TouchTracker::new(),
            None,
            &capture,
        );
        let views = seen.borrow().clone().unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views.get("footer"), Some(&None));
        let name = views.get("name").unwrap().as_ref().unwrap();
        let submit = views.get("submit").unwrap().as_ref().unwrap();
        assert_eq!(name.scope().map(|s| s.as_str()), Some("name"));
        assert_eq!(submit.scope().map(|s| s.as_str()), Some("submit"));
        assert_eq!(name.key.as_deref(), Some("isolate:name"));
    }

    #[test]
    fn form_validity_reaches_every_field() {
        let view = compose_view(
            &decl(),
            &values(""),
            &required(),
            &TouchTracker::new(),
            None,
            &column_renderer(),
        );
        insta::assert_snapshot!(view.to_markup(), @r#"<column><column key="isolate:name" scope="name"><textfield value="" hint="Name"></textfield></column><button key="isolate:submit" scope="submit" disabled>Send</button></column>"#);
    }

    #[test]
    fn stuck_class_marks_only_the_button() {
        let key = FieldKey::from("submit");
        let view = compose_view(
            &decl(),
            &values("Ann"),
            &required(),
            &TouchTracker::new(),
            Some(Stuck {
                field: &key,
                class_name: "hovering",
            }),
            &column_renderer(),
        );
        let button = view.find_scope("submit").unwrap();
        assert!(button.modifier.has_class("hovering"));
        assert!(!button.modifier.disabled);
        assert!(!view.find_scope("name").unwrap().modifier.has_class("hovering"));
    }

    #[test]
    fn existing_tags_and_keys_are_kept() {
        let own = IsolationTag::new(ScopeId::new("custom"));
        let v = tag_subtree(
            Text("x").modifier(Modifier::new().isolate(own.clone())),
            &"name".into(),
        );
        assert_eq!(v.modifier.isolation.as_slice(), [own]);
        assert_eq!(v.key.as_deref(), Some("isolate:custom"));

        let v = tag_subtree(Text("x").key("mine"), &"name".into());
        assert_eq!(v.key.as_deref(), Some("mine"));
        assert_eq!(v.scope().map(|s| s.as_str()), Some("name"));
    }

    #[test]
    fn missing_value_skips_subtree() {
        let mut vals = values("Ann");
        vals.remove("name");
        let view = compose_view(
            &decl(),
            &vals,
            &ValidatorMap::new(),
            &TouchTracker::new(),
            None,
            &column_renderer(),
        );
        assert!(view.find_scope("name").is_none());
        assert!(view.find_scope("submit").is_some());
    }
}
