use std::rc::Rc;

use reform_core::{
    Endo, HostSource, Scope, Signal, Stream, View, current_scope, derived, signal, untracked,
};

use crate::compose::{Renderer, Stuck, compose_view};
use crate::reducer::reducers;
use crate::sticky::reached_bottom_signal;
use crate::submit::{Submit, submissions};
use crate::{FieldKey, FormDeclaration, FormError, FormOptions, Isolator, TouchTracker, ValidatorMap, Values};

/// Everything reactive a form is built from.
pub struct FormInputs<V: 'static> {
    pub source: HostSource,
    pub values: Signal<Values<V>>,
    pub renderer: Signal<Renderer>,
    /// `Some(key)` clears one field's touched flag, `None` clears all.
    pub untouch: Stream<Option<FieldKey>>,
    pub validators: Signal<ValidatorMap<V>>,
}

impl<V: Clone + 'static> FormInputs<V> {
    pub fn new(source: HostSource, values: Signal<Values<V>>, renderer: Signal<Renderer>) -> Self {
        Self {
            source,
            values,
            renderer,
            untouch: Stream::never(),
            validators: signal(ValidatorMap::new()),
        }
    }

    pub fn with_untouch(mut self, untouch: Stream<Option<FieldKey>>) -> Self {
        self.untouch = untouch;
        self
    }

    pub fn with_validators(mut self, validators: Signal<ValidatorMap<V>>) -> Self {
        self.validators = validators;
        self
    }
}

/// A running form. Owns all of its wiring; [`dispose`](Self::dispose) it, or
/// the scope it was built in, to unsubscribe from every input.
pub struct Form<V: 'static> {
    view: Signal<View>,
    reducer: Stream<Endo<Values<V>>>,
    submit: Stream<Submit>,
    touched: TouchTracker,
    scope: Scope,
}

impl<V: Clone + 'static> Form<V> {
    /// Wires `decl` against `inputs`. Fails only on configuration mistakes;
    /// nothing is emitted until the host dispatches events.
    pub fn new(
        decl: FormDeclaration<V>,
        inputs: FormInputs<V>,
        options: FormOptions,
    ) -> Result<Self, FormError> {
        decl.check()?;
        for key in options.undeclared_keys(|k| decl.contains(k.as_str())) {
            log::warn!("form option names undeclared field `{key}`");
        }
        log::debug!(
            "building form: {} fields, isolating host: {}",
            decl.len(),
            inputs.source.can_isolate()
        );

        // built inside a parent scope, the form goes down with it
        let scope = current_scope().map(|parent| parent.child()).unwrap_or_default();
        let decl = Rc::new(decl);
        let FormInputs {
            source,
            values,
            renderer,
            untouch,
            validators,
        } = inputs;

        let (view, reducer, submit, touched) = scope.run(|| {
            let isolator = Isolator::new(&source);

            let touched = TouchTracker::new();
            touched.watch(&decl, &isolator, &untouch);

            let reducer = reducers(&decl, &isolator);
            let reached = reached_bottom_signal(&isolator, &options.hover_submit_button);
            let submit = submissions(&isolator, &options.custom_submission);

            let view = derived({
                let decl = decl.clone();
                let touched = touched.clone();
                let hover = options.hover_submit_button.clone();
                move || {
                    let values = values.get();
                    let renderer = renderer.get();
                    let validators = validators.get();
                    let reached = reached.get();
                    // field views and renderers must not subscribe the form
                    // to whatever they happen to read
                    untracked(|| {
                        let stuck = hover
                            .submit_button_field
                            .as_ref()
                            .filter(|_| reached)
                            .map(|field| Stuck {
                                field,
                                class_name: &hover.hovering_class_name,
                            });
                        compose_view(&decl, &values, &validators, &touched, stuck, &renderer)
                    })
                }
            });

            (view, reducer, submit, touched)
        });

        Ok(Self {
            view,
            reducer,
            submit,
            touched,
            scope,
        })
    }

    /// The current rendered tree; updates whenever values, validators, the
    /// renderer or the sticky state change.
    pub fn view(&self) -> &Signal<View> {
        &self.view
    }

    /// Whole-form updates, in arrival order. The caller applies them to its
    /// values signal, e.g. with [`Stream::apply_to`].
    pub fn reducer(&self) -> &Stream<Endo<Values<V>>> {
        &self.reducer
    }

    pub fn submit(&self) -> &Stream<Submit> {
        &self.submit
    }

    pub fn touched(&self) -> &TouchTracker {
        &self.touched
    }

    /// Unsubscribes from every input. Streams handed out earlier stop
    /// emitting and the view stops updating.
    pub fn dispose(self) {
        log::debug!("disposing form");
        self.scope.dispose();
    }
}

impl<V> std::fmt::Debug for Form<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("touched", &self.touched)
            .finish_non_exhaustive()
    }
}
