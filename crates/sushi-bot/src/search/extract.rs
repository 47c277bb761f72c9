use super::SearchTree;

/// Estimated value of `action` at the root of `tree`: the child's mean return.
///
/// Resolves to `0.0` when the root was never expanded, when `action` has no
/// child, or when the child has no visits. An unexplored action is therefore
/// indistinguishable from one whose mean is exactly zero.
pub fn action_value<A, T>(tree: &T, action: &A) -> f64
where
    T: SearchTree<A> + ?Sized,
{
    if !tree.has_children() {
        return 0.0;
    }
    tree.child_stats(action)
        .and_then(|stats| stats.mean())
        .unwrap_or(0.0)
}
