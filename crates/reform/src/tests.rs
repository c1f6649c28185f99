#[cfg(test)]
mod tests {
    use crate::*;
    use reform_core::widgets::{Box as Block, Button, Column, Row, Text, TextField};
    use reform_core::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn text_field(hint: &'static str) -> Field<String> {
        Field::new(
            move |input: FieldInput<String>, _| {
                let mut col = Column(Modifier::new()).child(TextField(input.value, hint));
                if input.touched
                    && let Some(err) = input.error
                {
                    col = col.child(Text(err));
                }
                col
            },
            |source: Rc<dyn EventSource>| {
                source.events(EventKind::Input).filter_map(|ev| {
                    let text = ev.text()?.to_string();
                    Some(Endo::new(move |_: String| text.clone()))
                })
            },
        )
    }

    fn decl() -> FormDeclaration<String> {
        FormDeclaration::new()
            .field("title", text_field("Title"))
            .field("notes", text_field("Notes"))
            .field(
                "actions",
                Field::display(|_: FieldInput<String>, status| {
                    Row(Modifier::new()).child(
                        Button("Save").modifier(Modifier::new().disabled(!status.valid)),
                    )
                }),
            )
            .field(
                "bottom",
                Field::display(|_: FieldInput<String>, _| Block(Modifier::new())),
            )
            .slot("legend")
    }

    fn initial_values() -> Values<String> {
        ["title", "notes", "actions", "bottom", "legend"]
            .into_iter()
            .map(|k| (FieldKey::from(k), String::new()))
            .collect()
    }

    fn stack() -> Renderer {
        renderer(|mut views| {
            let mut root = Column(Modifier::new());
            for key in ["title", "notes", "actions", "bottom", "legend"] {
                if let Some(Some(v)) = views.remove(key) {
                    root = root.child(v);
                }
            }
            root
        })
    }

    fn title_required() -> ValidatorMap<String> {
        ValidatorMap::new().with("title", |v: &String| {
            v.trim().is_empty().then(|| "Title is required".to_string())
        })
    }

    struct Harness {
        hub: EventHub,
        values: Signal<Values<String>>,
        validators: Signal<ValidatorMap<String>>,
        renderer: Signal<Renderer>,
        untouch: Stream<Option<FieldKey>>,
        scroll: Stream<f32>,
        form: Form<String>,
    }

    fn harness(custom: CustomSubmission) -> Harness {
        init_logs();
        let hub = EventHub::new();
        let values = signal(initial_values());
        let validators = signal(title_required());
        let renderer = signal(stack());
        let untouch = Stream::new();
        let scroll = Stream::new();

        let options = FormOptions::default()
            .custom_submission(custom)
            .hover_submit_button(
                HoverSubmitButton::default()
                    .submit_button_field("actions")
                    .border_field("bottom")
                    .scroll_position(scroll.clone()),
            );
        let inputs = FormInputs::new(hub.isolating(), values.clone(), renderer.clone())
            .with_untouch(untouch.clone())
            .with_validators(validators.clone());
        let form = Form::new(decl(), inputs, options).unwrap();
        form.reducer().apply_to(&values);

        Harness {
            hub,
            values,
            validators,
            renderer,
            untouch,
            scroll,
            form,
        }
    }

    fn input(text: &str, at: &str) -> DomEvent {
        DomEvent::new(EventKind::Input, EventPayload::Text(text.into())).at(at)
    }

    fn focus(at: &str) -> DomEvent {
        DomEvent::new(EventKind::Focus, EventPayload::None).at(at)
    }

    fn counter<T: 'static>(s: &Stream<T>) -> Rc<RefCell<usize>> {
        let n = Rc::new(RefCell::new(0));
        let n2 = n.clone();
        s.subscribe(move |_| *n2.borrow_mut() += 1);
        n
    }

    #[test]
    fn test_updates_reach_only_their_own_field() {
        let h = harness(CustomSubmission::default());
        h.hub.dispatch(input("Groceries", "title"));
        h.hub.dispatch(input("eggs", "notes"));

        let v = h.values.get();
        assert_eq!(v["title"], "Groceries");
        assert_eq!(v["notes"], "eggs");
        assert_eq!(v["legend"], "");
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn test_events_outside_any_field_change_nothing() {
        let h = harness(CustomSubmission::default());
        let updates = counter(h.form.reducer());
        h.hub.dispatch(DomEvent::new(EventKind::Input, EventPayload::Text("x".into())));
        h.hub.dispatch(input("x", "legend"));
        assert_eq!(*updates.borrow(), 0);
        assert_eq!(h.values.get(), initial_values());
    }

    #[test]
    fn test_initial_render() {
        let h = harness(CustomSubmission::default());
        insta::assert_snapshot!(h.form.view().get().to_markup(), @r#"<column><column key="isolate:title" scope="title"><textfield value="" hint="Title"></textfield></column><column key="isolate:notes" scope="notes"><textfield value="" hint="Notes"></textfield></column><row key="isolate:actions" scope="actions"><button disabled>Save</button></row><box key="isolate:bottom" scope="bottom"></box></column>"#);
    }

    #[test]
    fn test_view_follows_values_and_validity() {
        let h = harness(CustomSubmission::default());
        let save_disabled = |h: &Harness| {
            h.form
                .view()
                .get()
                .find_scope("actions")
                .and_then(|row| row.children.first())
                .map(|b| b.modifier.disabled)
        };
        assert_eq!(save_disabled(&h), Some(true));

        h.hub.dispatch(input("Groceries", "title"));
        assert_eq!(save_disabled(&h), Some(false));
        assert!(
            h.form
                .view()
                .get()
                .to_markup()
                .contains(r#"value="Groceries""#)
        );

        h.hub.dispatch(input("   ", "title"));
        assert_eq!(save_disabled(&h), Some(true));
    }

    #[test]
    fn test_errors_show_once_touched() {
        let h = harness(CustomSubmission::default());
        let shows_error = |h: &Harness| h.form.view().get().to_markup().contains("Title is required");
        assert!(!shows_error(&h));

        // the input both touches the field and rerenders it
        h.hub.dispatch(input(" ", "title"));
        assert!(h.form.touched().is_touched("title"));
        assert!(shows_error(&h));
    }

    #[test]
    fn test_validators_can_be_swapped() {
        let h = harness(CustomSubmission::default());
        h.hub.dispatch(focus("notes"));
        h.validators.set(ValidatorMap::new().with("notes", |v: &String| {
            (v.len() < 3).then(|| "Too short".to_string())
        }));
        let markup = h.form.view().get().to_markup();
        assert!(markup.contains("Too short"));
        assert!(!markup.contains("Title is required"));
    }

    #[test]
    fn test_renderer_can_be_swapped() {
        let h = harness(CustomSubmission::default());
        h.renderer.set(renderer(|views| {
            let mut root = Row(Modifier::new());
            if let Some(Some(actions)) = views.get("actions") {
                root = root.child(actions.clone());
            }
            root
        }));
        let view = h.form.view().get();
        assert!(view.find_scope("actions").is_some());
        assert!(view.find_scope("title").is_none());
    }

    #[test]
    fn test_touch_and_untouch() {
        let h = harness(CustomSubmission::default());
        h.hub.dispatch(focus("title"));
        h.hub.dispatch(DomEvent::new(EventKind::Change, EventPayload::None).at("notes"));
        h.hub.dispatch(focus("legend"));
        h.hub.dispatch(DomEvent::new(EventKind::Blur, EventPayload::None).at("bottom"));
        assert_eq!(
            h.form.touched().touched_keys(),
            vec![FieldKey::from("notes"), FieldKey::from("title")]
        );

        h.untouch.emit(Some("title".into()));
        assert!(!h.form.touched().is_touched("title"));
        assert!(h.form.touched().is_touched("notes"));

        h.untouch.emit(None);
        assert!(h.form.touched().is_empty());
    }

    #[test]
    fn test_sticky_submit_marks_button() {
        let h = harness(CustomSubmission::default());
        let hovering = |h: &Harness| {
            h.form
                .view()
                .get()
                .find_scope("actions")
                .is_some_and(|v| v.modifier.has_class("hovering"))
        };

        h.hub
            .report_geometry(Some(&ScopeId::new("bottom")), Rect::new(0.0, 500.0, 400.0, 50.0));
        h.hub
            .report_geometry(Some(&ScopeId::new("actions")), Rect::new(0.0, 510.0, 400.0, 40.0));
        assert!(!hovering(&h), "nothing happens before a scroll");

        h.scroll.emit(0.0);
        assert!(!hovering(&h));

        h.hub
            .report_geometry(Some(&ScopeId::new("actions")), Rect::new(0.0, 521.0, 400.0, 40.0));
        assert!(!hovering(&h), "geometry alone does not recompute");
        h.scroll.emit(12.0);
        assert!(hovering(&h));
        assert!(!h.form.view().get().find_scope("bottom").is_some_and(|v| v.modifier.has_class("hovering")));

        h.hub
            .report_geometry(Some(&ScopeId::new("actions")), Rect::new(0.0, 400.0, 400.0, 40.0));
        h.scroll.emit(40.0);
        assert!(!hovering(&h));
    }

    #[test]
    fn test_sticky_submit_custom_class() {
        init_logs();
        let hub = EventHub::new();
        let scroll = Stream::new();
        let values = signal(initial_values());
        let options = FormOptions::default().hover_submit_button(
            HoverSubmitButton::default()
                .submit_button_field("actions")
                .border_field("bottom")
                .hovering_class_name("stuck")
                .scroll_position(scroll.clone()),
        );
        let form = Form::new(
            decl(),
            FormInputs::new(hub.isolating(), values, signal(stack())),
            options,
        )
        .unwrap();

        hub.report_geometry(Some(&ScopeId::new("bottom")), Rect::new(0.0, 0.0, 10.0, 100.0));
        hub.report_geometry(Some(&ScopeId::new("actions")), Rect::new(0.0, 90.0, 10.0, 10.0));
        scroll.emit(1.0);
        let view = form.view().get();
        let actions = view.find_scope("actions").unwrap();
        assert!(actions.modifier.has_class("stuck"));
        assert!(!actions.modifier.has_class("hovering"));
    }

    #[test]
    fn test_submission_sources() {
        let h = harness(CustomSubmission::default().field("notes"));
        let submits = counter(h.form.submit());
        let chord = |at: &str| DomEvent::key_down(KeyEvent::new(Key::Enter, Modifiers::CTRL)).at(at);

        h.hub.dispatch(chord("notes"));
        assert_eq!(*submits.borrow(), 1);

        h.hub.dispatch(chord("title"));
        assert_eq!(*submits.borrow(), 1);

        let native = DomEvent::submit();
        h.hub.dispatch(native.clone());
        assert_eq!(*submits.borrow(), 2);
        assert!(native.default_prevented());
    }

    #[test]
    fn test_native_and_keybind_are_not_deduplicated() {
        let h = harness(CustomSubmission::default().field("notes"));
        let submits = counter(h.form.submit());
        h.hub.dispatch(DomEvent::key_down(KeyEvent::new(Key::Enter, Modifiers::META)).at("notes"));
        h.hub.dispatch(DomEvent::submit());
        assert_eq!(*submits.borrow(), 2);
    }

    #[test]
    fn test_dispose_stops_everything() {
        let h = harness(CustomSubmission::default().field("notes"));
        let submits = counter(h.form.submit());
        let updates = counter(h.form.reducer());
        let view = h.form.view().clone();
        let touched = h.form.touched().clone();
        let before = view.get();

        h.form.dispose();

        h.hub.dispatch(input("late", "title"));
        h.hub.dispatch(focus("notes"));
        h.hub.dispatch(DomEvent::submit());
        h.hub.dispatch(DomEvent::key_down(KeyEvent::new(Key::Enter, Modifiers::CTRL)).at("notes"));
        h.values.update(|v| {
            v.insert("title".into(), "direct".into());
        });
        h.scroll.emit(1.0);

        assert_eq!(*submits.borrow(), 0);
        assert_eq!(*updates.borrow(), 0);
        assert!(touched.is_empty());
        assert_eq!(view.get(), before);
    }

    #[test]
    fn test_view_catches_up_with_writes_from_its_subscribers() {
        init_logs();
        let hub = EventHub::new();
        let decl = FormDeclaration::new().field(
            "name",
            Field::display(|input: FieldInput<String>, _| Text(input.value)),
        );
        let values = signal(Values::from([("name".into(), String::new())]));
        let render = signal(renderer(|views| {
            Column(Modifier::new()).with_children(views.into_values().flatten().collect())
        }));
        let form = Form::new(
            decl,
            FormInputs::new(hub.isolating(), values.clone(), render),
            FormOptions::default(),
        )
        .unwrap();

        // normalizes whatever is shown, writing back while the view is recomputing
        {
            let values = values.clone();
            form.view().subscribe(move |view| {
                if view.to_markup().contains(">raw<") {
                    values.update(|v| {
                        v.insert("name".into(), "normalized".into());
                    });
                }
            });
        }

        values.update(|v| {
            v.insert("name".into(), "raw".into());
        });
        assert_eq!(values.get()["name"], "normalized");
        insta::assert_snapshot!(form.view().get().to_markup(), @r#"<column><text key="isolate:name" scope="name">normalized</text></column>"#);
    }

    #[test]
    fn test_form_is_torn_down_with_its_parent_scope() {
        init_logs();
        let hub = EventHub::new();
        let values = signal(initial_values());
        let parent = Scope::new();
        let form = parent.run(|| {
            Form::new(
                decl(),
                FormInputs::new(hub.isolating(), values.clone(), signal(stack())),
                FormOptions::default(),
            )
            .unwrap()
        });
        let updates = counter(form.reducer());

        hub.dispatch(input("before", "title"));
        assert_eq!(*updates.borrow(), 1);

        parent.dispose();
        hub.dispatch(input("after", "title"));
        hub.dispatch(focus("notes"));
        assert_eq!(*updates.borrow(), 1);
        assert!(!form.touched().is_touched("notes"));
    }

    #[test]
    fn test_disposed_form_leaves_no_channels_behind() {
        let h = harness(CustomSubmission::default().field("notes"));
        assert!(h.hub.channel_count() > 0);

        h.form.dispose();
        h.hub.dispatch(focus("title"));
        assert_eq!(h.hub.channel_count(), 0);
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let hub = EventHub::new();
        let decl = FormDeclaration::new()
            .field("title", text_field("Title"))
            .slot("title");
        let err = Form::new(
            decl,
            FormInputs::new(hub.isolating(), signal(initial_values()), signal(stack())),
            FormOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::DuplicateField(ref k) if k.as_str() == "title"));
        assert_eq!(err.to_string(), "field `title` is declared more than once");
    }

    #[test]
    fn test_plain_host_degrades_to_shared_events() {
        init_logs();
        let hub = EventHub::new();
        let values = signal(initial_values());
        let form = Form::new(
            decl(),
            FormInputs::new(hub.plain(), values.clone(), signal(stack())),
            FormOptions::default(),
        )
        .unwrap();
        form.reducer().apply_to(&values);

        hub.dispatch(input("both", "title"));
        let v = values.get();
        assert_eq!(v["title"], "both");
        assert_eq!(v["notes"], "both");
        assert!(form.touched().is_touched("notes"));
        // subtrees are still tagged, the host just cannot route by them
        assert!(form.view().get().find_scope("notes").is_some());
    }

    #[test]
    fn test_unscoped_field_sees_the_whole_form() {
        init_logs();
        let hub = EventHub::new();
        let keystrokes = Field::new(
            |input: FieldInput<String>, _| Text(input.value),
            |source: Rc<dyn EventSource>| {
                source
                    .events(EventKind::Input)
                    .map(|_| Endo::new(|v: String| format!("{v}.")))
            },
        )
        .isolated(false);
        let decl = decl().field("keystrokes", keystrokes);
        let mut init = initial_values();
        init.insert("keystrokes".into(), String::new());
        let values = signal(init);
        let form = Form::new(
            decl,
            FormInputs::new(hub.isolating(), values.clone(), signal(stack())),
            FormOptions::default(),
        )
        .unwrap();
        form.reducer().apply_to(&values);

        hub.dispatch(input("a", "title"));
        hub.dispatch(input("b", "notes"));
        assert_eq!(values.get()["keystrokes"], "..");
        // touch tracking stays scoped
        assert!(!form.touched().is_touched("keystrokes"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_form_from_json_config() {
        init_logs();
        let config = FormConfig::from_json(
            r#"{
                "submissionFields": ["title"],
                "submitKeys": ["Shift+Enter"],
                "submitButtonField": "actions",
                "borderField": "bottom"
            }"#,
        )
        .unwrap();
        let hub = EventHub::new();
        let form = Form::new(
            decl(),
            FormInputs::new(hub.isolating(), signal(initial_values()), signal(stack())),
            config.into_options(Stream::never()).unwrap(),
        )
        .unwrap();
        let submits = counter(form.submit());

        hub.dispatch(DomEvent::key_down(KeyEvent::new(Key::Enter, Modifiers::CTRL)).at("title"));
        hub.dispatch(DomEvent::key_down(KeyEvent::new(Key::Enter, Modifiers::SHIFT)).at("title"));
        assert_eq!(*submits.borrow(), 1);
    }
}
