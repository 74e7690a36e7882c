use crate::diagnostics::{Report, Subject};
use crate::error::Result;
use crate::geometry::PolygonLoop;

use super::{AdaptiveRadii, ConflictPolicy, ConflictResolver, FilletLoop, FilletRadii, RadiusSpec, DEFAULT_PRECISION};

/// Fillet settings attached to a shape, decided when the shape is configured.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilletConfig {
    /// Sharp corners.
    #[default]
    None,
    /// One radius rule for every vertex.
    Uniform {
        radius: RadiusSpec,
        precision: f64,
        interactive: bool,
    },
    /// Separate radius rules for convex and concave vertices.
    Adaptive {
        radii: AdaptiveRadii,
        precision: f64,
        interactive: bool,
    },
}

impl FilletConfig {
    /// Non-interactive uniform fillet with the default precision.
    #[must_use]
    pub fn uniform(radius: f64) -> Self {
        Self::Uniform {
            radius: RadiusSpec::Uniform(radius),
            precision: DEFAULT_PRECISION,
            interactive: false,
        }
    }

    /// Non-interactive adaptive fillet with the default precision.
    #[must_use]
    pub fn adaptive(convex: f64, concave: f64) -> Self {
        Self::Adaptive {
            radii: AdaptiveRadii::new(RadiusSpec::Uniform(convex), RadiusSpec::Uniform(concave)),
            precision: DEFAULT_PRECISION,
            interactive: false,
        }
    }

    /// Base `(convex, concave)` radii for the unshifted contour. A uniform
    /// radius applies to both kinds.
    #[must_use]
    pub fn base_radii(&self) -> Option<AdaptiveRadii> {
        match self {
            Self::None => None,
            Self::Uniform { radius, .. } => Some(AdaptiveRadii::new(radius.clone(), radius.clone())),
            Self::Adaptive { radii, .. } => Some(radii.clone()),
        }
    }

    #[must_use]
    pub fn precision(&self) -> f64 {
        match self {
            Self::None => DEFAULT_PRECISION,
            Self::Uniform { precision, .. } | Self::Adaptive { precision, .. } => *precision,
        }
    }

    /// Whether conflicts are deferred to the caller's resolver. Otherwise the
    /// requested radius is kept ([`ConflictPolicy::Force`]).
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match self {
            Self::None => false,
            Self::Uniform { interactive, .. } | Self::Adaptive { interactive, .. } => *interactive,
        }
    }

    /// Fillets a boundary whose convex radii are shifted by `convex_delta`
    /// and concave radii by `concave_delta` relative to the base radii.
    ///
    /// Radii pushed to zero or below are reported under `scope` and leave
    /// their vertices sharp.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::error::GeometryError::TangentOverflow`].
    pub(crate) fn apply(
        &self,
        polygon: &PolygonLoop,
        convex_delta: f64,
        concave_delta: f64,
        resolver: &mut dyn ConflictResolver,
        report: &mut Report,
        scope: &Subject,
    ) -> Result<PolygonLoop> {
        let Some(base) = self.base_radii() else {
            return Ok(polygon.clone());
        };
        let (radii, clamped) = base.shifted(convex_delta, concave_delta);
        if clamped > 0 {
            report.warn(
                scope.clone(),
                format!("{clamped} fillet radius value(s) fell to zero or below after adjustment; those corners stay sharp"),
            );
        }
        if radii.is_inactive() {
            return Ok(polygon.clone());
        }

        let mut force = ConflictPolicy::Force;
        let resolver: &mut dyn ConflictResolver = if self.is_interactive() {
            resolver
        } else {
            &mut force
        };
        let filleted = FilletLoop::new(polygon, FilletRadii::Adaptive(radii))
            .precision(self.precision())
            .execute(resolver)?;
        report.absorb(filleted.report, Some(scope));
        Ok(filleted.polygon)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::fillet::{ConflictDecision, RadiusConflict};

    fn square() -> PolygonLoop {
        PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn none_leaves_loop_untouched() {
        let mut report = Report::new();
        let out = FilletConfig::None
            .apply(&square(), 1.0, -1.0, &mut ConflictPolicy::Force, &mut report, &Subject::Loop)
            .unwrap();
        assert_eq!(out, square());
        assert!(report.is_empty());
    }

    #[test]
    fn uniform_maps_to_both_kinds() {
        let radii = FilletConfig::uniform(2.0).base_radii().unwrap();
        assert_eq!(radii, AdaptiveRadii::uniform(2.0));
    }

    #[test]
    fn clamped_radii_are_reported() {
        let mut report = Report::new();
        let out = FilletConfig::uniform(1.0)
            .apply(&square(), -2.0, -2.0, &mut ConflictPolicy::Force, &mut report, &Subject::Ring(0))
            .unwrap();
        assert_eq!(out, square());
        assert!(report.warnings().any(|d| d.subject == Subject::Ring(0)));
    }

    #[test]
    fn non_interactive_never_asks() {
        let thin = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]);
        let mut asked = false;
        let mut resolver = |_: &RadiusConflict| {
            asked = true;
            ConflictDecision::Shrink
        };
        let mut report = Report::new();
        FilletConfig::uniform(1.2)
            .apply(&thin, 0.0, 0.0, &mut resolver, &mut report, &Subject::Loop)
            .unwrap();
        assert!(!asked);
    }

    #[test]
    fn interactive_defers_to_resolver() {
        let thin = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]);
        let config = FilletConfig::Uniform {
            radius: RadiusSpec::Uniform(1.2),
            precision: 0.1,
            interactive: true,
        };
        let mut asked = 0;
        let mut resolver = |_: &RadiusConflict| {
            asked += 1;
            ConflictDecision::Shrink
        };
        let mut report = Report::new();
        config
            .apply(&thin, 0.0, 0.0, &mut resolver, &mut report, &Subject::Loop)
            .unwrap();
        assert_eq!(asked, 1);
    }
}
