use crate::diagnostics::{Report, Subject};
use crate::geometry::PolygonLoop;
use crate::operations::classify::{classify, VertexKind};

/// Fillet radius for a loop: one value for every vertex, or one per vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum RadiusSpec {
    Uniform(f64),
    PerVertex(Vec<f64>),
}

impl RadiusSpec {
    /// Expands to one radius per vertex.
    ///
    /// Returns `None` if a per-vertex list does not have exactly `n` entries.
    #[must_use]
    pub fn resolve(&self, n: usize) -> Option<Vec<f64>> {
        match self {
            Self::Uniform(r) => Some(vec![*r; n]),
            Self::PerVertex(list) if list.len() == n => Some(list.clone()),
            Self::PerVertex(_) => None,
        }
    }

    /// Returns `true` if no entry is a positive radius.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        match self {
            Self::Uniform(r) => !is_active(*r),
            Self::PerVertex(list) => !list.iter().any(|r| is_active(*r)),
        }
    }

    /// Adds `delta` to every radius, clamping at zero.
    ///
    /// Also returns how many previously positive radii were clamped away.
    #[must_use]
    pub fn shifted(&self, delta: f64) -> (Self, usize) {
        let shift = |r: f64| {
            let v = r + delta;
            if v > 0.0 {
                (v, false)
            } else {
                (0.0, is_active(r))
            }
        };
        match self {
            Self::Uniform(r) => {
                let (v, lost) = shift(*r);
                (Self::Uniform(v), usize::from(lost))
            }
            Self::PerVertex(list) => {
                let mut lost = 0;
                let values = list
                    .iter()
                    .map(|r| {
                        let (v, l) = shift(*r);
                        lost += usize::from(l);
                        v
                    })
                    .collect();
                (Self::PerVertex(values), lost)
            }
        }
    }

    fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Uniform(_) => None,
            Self::PerVertex(list) => Some(list.len()),
        }
    }
}

/// Separate radii for convex and concave vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveRadii {
    pub convex: RadiusSpec,
    pub concave: RadiusSpec,
}

impl AdaptiveRadii {
    #[must_use]
    pub fn new(convex: RadiusSpec, concave: RadiusSpec) -> Self {
        Self { convex, concave }
    }

    /// The same scalar radius for both vertex kinds.
    #[must_use]
    pub fn uniform(radius: f64) -> Self {
        Self::new(RadiusSpec::Uniform(radius), RadiusSpec::Uniform(radius))
    }

    /// Shifts convex radii by `convex_delta` and concave radii by
    /// `concave_delta`, clamping at zero. Returns the shifted radii and the
    /// number of positive radii that were clamped away.
    #[must_use]
    pub fn shifted(&self, convex_delta: f64, concave_delta: f64) -> (Self, usize) {
        let (convex, lost_convex) = self.convex.shifted(convex_delta);
        let (concave, lost_concave) = self.concave.shifted(concave_delta);
        (Self { convex, concave }, lost_convex + lost_concave)
    }

    /// Radii adjusted for a boundary offset outward by `distance` from the
    /// silhouette these radii were specified for: convex arcs grow with the
    /// boundary and concave arcs shrink.
    #[must_use]
    pub fn for_offset(&self, distance: f64) -> (Self, usize) {
        self.shifted(distance, -distance)
    }

    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.convex.is_inactive() && self.concave.is_inactive()
    }
}

/// Radius assignment for a fillet call.
#[derive(Debug, Clone, PartialEq)]
pub enum FilletRadii {
    /// Same rule for every vertex regardless of convexity.
    Uniform(RadiusSpec),
    /// Radius chosen per vertex from its convex/concave classification.
    Adaptive(AdaptiveRadii),
}

impl FilletRadii {
    /// Resolves one radius per vertex of `polygon`.
    ///
    /// Length mismatches are reported and yield `None`.
    pub(crate) fn per_vertex(&self, polygon: &PolygonLoop, report: &mut Report) -> Option<Vec<f64>> {
        let n = polygon.len();
        match self {
            Self::Uniform(spec) => {
                let resolved = spec.resolve(n);
                if resolved.is_none() {
                    report_mismatch(report, "radius", spec, n);
                }
                resolved
            }
            Self::Adaptive(radii) => {
                let Some(convex) = radii.convex.resolve(n) else {
                    report_mismatch(report, "convex radius", &radii.convex, n);
                    return None;
                };
                let Some(concave) = radii.concave.resolve(n) else {
                    report_mismatch(report, "concave radius", &radii.concave, n);
                    return None;
                };
                Some(
                    classify(polygon)
                        .into_iter()
                        .enumerate()
                        .map(|(i, kind)| match kind {
                            VertexKind::Convex => convex[i],
                            VertexKind::Concave => concave[i],
                        })
                        .collect(),
                )
            }
        }
    }
}

fn report_mismatch(report: &mut Report, what: &str, spec: &RadiusSpec, n: usize) {
    let len = spec.len_hint().unwrap_or(n);
    report.warn(
        Subject::Loop,
        format!("{what} list has {len} entries but the loop has {n} vertices; fillet skipped"),
    );
}

/// A radius takes part in filleting only when it is strictly positive.
pub(crate) fn is_active(radius: f64) -> bool {
    radius.is_finite() && radius > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_resolves_to_every_vertex() {
        assert_eq!(RadiusSpec::Uniform(2.0).resolve(3), Some(vec![2.0, 2.0, 2.0]));
    }

    #[test]
    fn list_length_must_match() {
        let spec = RadiusSpec::PerVertex(vec![1.0, 2.0]);
        assert_eq!(spec.resolve(2), Some(vec![1.0, 2.0]));
        assert_eq!(spec.resolve(3), None);
    }

    #[test]
    fn shifted_clamps_and_counts() {
        let (spec, lost) = RadiusSpec::PerVertex(vec![1.0, 3.0, 0.0]).shifted(-2.0);
        assert_eq!(spec, RadiusSpec::PerVertex(vec![0.0, 1.0, 0.0]));
        assert_eq!(lost, 1);
    }

    #[test]
    fn for_offset_grows_convex_and_shrinks_concave() {
        let (radii, lost) = AdaptiveRadii::new(RadiusSpec::Uniform(2.0), RadiusSpec::Uniform(3.0)).for_offset(1.0);
        assert_eq!(radii.convex, RadiusSpec::Uniform(3.0));
        assert_eq!(radii.concave, RadiusSpec::Uniform(2.0));
        assert_eq!(lost, 0);
    }

    #[test]
    fn inactive_detection() {
        assert!(RadiusSpec::Uniform(0.0).is_inactive());
        assert!(RadiusSpec::PerVertex(vec![0.0, -1.0]).is_inactive());
        assert!(!RadiusSpec::PerVertex(vec![0.0, 1.0]).is_inactive());
        assert!(AdaptiveRadii::uniform(0.0).is_inactive());
    }

    #[test]
    fn adaptive_picks_by_convexity() {
        // L-shape: vertex 3 is the only concave corner.
        let l = PolygonLoop::from_xy(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ]);
        let radii = FilletRadii::Adaptive(AdaptiveRadii::new(RadiusSpec::Uniform(1.0), RadiusSpec::Uniform(0.5)));
        let mut report = Report::new();
        let per_vertex = radii.per_vertex(&l, &mut report);
        assert_eq!(per_vertex, Some(vec![1.0, 1.0, 1.0, 0.5, 1.0, 1.0]));
        assert!(report.is_empty());
    }

    #[test]
    fn adaptive_mismatch_is_reported() {
        let tri = PolygonLoop::from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let radii = FilletRadii::Adaptive(AdaptiveRadii::new(
            RadiusSpec::PerVertex(vec![1.0]),
            RadiusSpec::Uniform(0.5),
        ));
        let mut report = Report::new();
        assert!(radii.per_vertex(&tri, &mut report).is_none());
        assert!(report.has_warnings());
    }
}
