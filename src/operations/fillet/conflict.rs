use tracing::info;

/// How to handle a radius whose tangent distance exceeds half the shorter
/// adjacent edge (but stays within the hard 0.8x limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Keep the requested radius; neighbouring fillets may overlap visually.
    Force,
    /// Shrink the radius so the tangent distance is 95% of half the shorter
    /// edge.
    Shrink,
}

/// Details of the first conflicting vertex, passed to a [`ConflictResolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusConflict {
    pub vertex: usize,
    pub radius: f64,
    pub tangent_distance: f64,
    /// Half of the shorter adjacent edge; the soft limit that was exceeded.
    pub limit: f64,
}

/// Decides how radius conflicts are handled.
///
/// A fillet call consults its resolver at most once, on the first conflict,
/// and applies that decision to every later conflict in the same call.
/// Interactive front-ends implement this to ask an operator; batch callers
/// pass a [`ConflictPolicy`].
pub trait ConflictResolver {
    fn resolve_conflict(&mut self, conflict: &RadiusConflict) -> ConflictDecision;
}

/// Fixed answer to every conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    Force,
    Shrink,
}

impl ConflictResolver for ConflictPolicy {
    fn resolve_conflict(&mut self, _conflict: &RadiusConflict) -> ConflictDecision {
        match self {
            Self::Force => ConflictDecision::Force,
            Self::Shrink => ConflictDecision::Shrink,
        }
    }
}

impl<F> ConflictResolver for F
where
    F: FnMut(&RadiusConflict) -> ConflictDecision,
{
    fn resolve_conflict(&mut self, conflict: &RadiusConflict) -> ConflictDecision {
        self(conflict)
    }
}

/// Caches the first decision for the duration of one fillet call.
pub(crate) struct DecisionCache<'r> {
    resolver: &'r mut dyn ConflictResolver,
    decided: Option<ConflictDecision>,
}

impl<'r> DecisionCache<'r> {
    pub(crate) fn new(resolver: &'r mut dyn ConflictResolver) -> Self {
        Self {
            resolver,
            decided: None,
        }
    }

    pub(crate) fn decide(&mut self, conflict: &RadiusConflict) -> ConflictDecision {
        if let Some(decision) = self.decided {
            return decision;
        }
        let decision = self.resolver.resolve_conflict(conflict);
        info!(
            vertex = conflict.vertex,
            tangent_distance = conflict.tangent_distance,
            limit = conflict.limit,
            ?decision,
            "radius conflict resolved"
        );
        self.decided = Some(decision);
        decision
    }
}
