//! Contracts between the decision planners and an external tree search.
//!
//! The planners never look inside a search tree beyond the root's children:
//! a [`SearchTree`] only has to report, per action, the accumulated return and
//! visit count of the matching root child.

mod extract;

pub use extract::action_value;

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;

/// Accumulated statistics for one root child.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChildStats {
    pub total_return: f64,
    pub visits: u32,
}

impl ChildStats {
    pub const fn new(total_return: f64, visits: u32) -> Self {
        Self {
            total_return,
            visits,
        }
    }

    /// Mean return, or `None` for an unvisited child.
    pub fn mean(&self) -> Option<f64> {
        if self.visits == 0 {
            None
        } else {
            Some(self.total_return / f64::from(self.visits))
        }
    }
}

/// Read access to a completed search tree's root.
pub trait SearchTree<A> {
    /// Statistics of the root child reached by `action`, if it was expanded.
    fn child_stats(&self, action: &A) -> Option<ChildStats>;

    fn has_children(&self) -> bool;
}

/// A synchronous tree search run to completion on one state.
pub trait SearchProcedure<S, A> {
    type Tree: SearchTree<A>;

    fn run(&mut self, state: S, actions: &[A], budget: Duration)
    -> Result<Self::Tree, SearchError>;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("search failed: {reason}")]
    Failed { reason: String },
    /// The procedure left its input in an unusable state; the determinization
    /// it was handed must not be reused.
    #[error("search corrupted its working state: {reason}")]
    CorruptedState { reason: String },
}

impl SearchError {
    pub fn failed(reason: impl Into<String>) -> Self {
        SearchError::Failed {
            reason: reason.into(),
        }
    }

    pub fn corrupted(reason: impl Into<String>) -> Self {
        SearchError::CorruptedState {
            reason: reason.into(),
        }
    }
}

/// Root-children table of a completed search.
#[derive(Debug, Clone)]
pub struct RootStats<A> {
    children: HashMap<A, ChildStats>,
}

impl<A> Default for RootStats<A> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
        }
    }
}

impl<A> RootStats<A>
where
    A: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: A, stats: ChildStats) {
        self.children.insert(action, stats);
    }

    pub fn with_child(mut self, action: A, total_return: f64, visits: u32) -> Self {
        self.insert(action, ChildStats::new(total_return, visits));
        self
    }

    /// Adds one simulated return to `action`'s child, creating it on first use.
    pub fn backup(&mut self, action: A, value: f64) {
        let entry = self.children.entry(action).or_default();
        entry.total_return += value;
        entry.visits = entry.visits.saturating_add(1);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<A> SearchTree<A> for RootStats<A>
where
    A: Eq + Hash,
{
    fn child_stats(&self, action: &A) -> Option<ChildStats> {
        self.children.get(action).copied()
    }

    fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
