use std::rc::Rc;

/// A pure `T -> T` transformation; one atomic proposed change.
pub struct Endo<T: 'static>(Rc<dyn Fn(T) -> T>);

impl<T> Clone for Endo<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> std::fmt::Debug for Endo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Endo(<fn>)")
    }
}

impl<T: 'static> Endo<T> {
    pub fn new(f: impl Fn(T) -> T + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn identity() -> Self {
        Self::new(|v| v)
    }

    pub fn apply(&self, v: T) -> T {
        (self.0)(v)
    }

    /// `self` first, then `next`.
    pub fn then(&self, next: &Endo<T>) -> Endo<T> {
        let first = self.0.clone();
        let second = next.0.clone();
        Endo::new(move |v| second(first(v)))
    }
}

/// Applies each endofunction in order.
pub fn apply_all<T: 'static>(initial: T, endos: impl IntoIterator<Item = Endo<T>>) -> T {
    endos.into_iter().fold(initial, |acc, e| e.apply(acc))
}
