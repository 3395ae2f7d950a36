//! Per-boundary resolution state machine.

use std::collections::HashMap;

use rill_core::RenderError;

/// Phase of one suspense boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPhase {
    /// Fallback markup is live; resolved content not yet emitted.
    Pending,
    /// Resolved content has been emitted; fallback is superseded.
    Resolved,
}

/// State machine for one suspense boundary.
///
/// The `Pending -> Resolved` transition fires exactly once. Emission is
/// derived from the phase, so fallback and resolved content for one
/// boundary can never be produced out of order.
#[derive(Debug, Clone)]
pub struct BoundaryState {
    name: String,
    phase: BoundaryPhase,
}

impl BoundaryState {
    /// Create a new pending boundary.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: BoundaryPhase::Pending,
        }
    }

    /// Boundary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current phase.
    pub fn phase(&self) -> BoundaryPhase {
        self.phase
    }

    /// Whether the boundary is still showing its fallback.
    pub fn is_pending(&self) -> bool {
        self.phase == BoundaryPhase::Pending
    }

    /// Fire the resolution transition. Errors if already fired.
    pub fn resolve(&mut self) -> Result<(), RenderError> {
        if self.phase == BoundaryPhase::Resolved {
            return Err(RenderError::AlreadyResolved(self.name.clone()));
        }
        self.phase = BoundaryPhase::Resolved;
        Ok(())
    }
}

/// Tracks every boundary of one response.
#[derive(Debug, Default)]
pub struct BoundaryLedger {
    states: HashMap<String, BoundaryState>,
    order: Vec<String>,
}

impl BoundaryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a boundary in document order.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.states
            .insert(name.clone(), BoundaryState::new(name.clone()));
        self.order.push(name);
    }

    /// Fire the resolution transition for a named boundary.
    pub fn resolve(&mut self, name: &str) -> Result<(), RenderError> {
        match self.states.get_mut(name) {
            Some(state) => state.resolve(),
            None => Err(RenderError::BoundaryFailed(
                name.to_string(),
                "unknown boundary".to_string(),
            )),
        }
    }

    /// Phase of a named boundary.
    pub fn phase(&self, name: &str) -> Option<BoundaryPhase> {
        self.states.get(name).map(|s| s.phase())
    }

    /// Names of boundaries still pending, in document order.
    pub fn pending(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|n| self.states[n.as_str()].is_pending())
            .map(|n| n.as_str())
            .collect()
    }

    /// Whether every registered boundary has resolved.
    pub fn all_resolved(&self) -> bool {
        self.states.values().all(|s| !s.is_pending())
    }

    /// Number of registered boundaries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the ledger has no boundaries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
