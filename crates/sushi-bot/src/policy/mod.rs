use crate::ensemble::{DecisionError, DecisionStats};

/// Unified interface for the planners: pick one of `legal` for `state`.
pub trait DecisionPolicy<S, A> {
    /// Returns an element of `legal`. Fails only when `legal` is empty.
    fn decide(&mut self, state: &S, legal: &[A]) -> Result<A, DecisionError>;

    fn stats(&self) -> DecisionStats;
}

impl<S, A, T> DecisionPolicy<S, A> for Box<T>
where
    T: DecisionPolicy<S, A> + ?Sized,
{
    fn decide(&mut self, state: &S, legal: &[A]) -> Result<A, DecisionError> {
        (**self).decide(state, legal)
    }

    fn stats(&self) -> DecisionStats {
        (**self).stats()
    }
}
