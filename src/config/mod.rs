//! JSON shape descriptions and their conversion into layout geometry.
//!
//! A document has three sections:
//!
//! ```json
//! {
//!   "global": { "dbu": 0.001, "interactive": false },
//!   "gds": { "cell_name": "TOP", "default_layer": [1, 0] },
//!   "shapes": [
//!     { "name": "guard", "type": "rings", "vertices": "0,0:100,0:100,100:0,100",
//!       "ring_width": 10, "ring_space": [[1, 2, 5], [3, 3, 8]], "ring_num": 3,
//!       "fillet": { "type": "adaptive", "convex_radius": 4, "concave_radius": 2 } }
//!   ]
//! }
//! ```
//!
//! Records are deserialized loosely and validated per shape into a
//! [`ShapeJob`]; a shape that fails validation is skipped with a warning and
//! the rest of the document is still built.

mod vertices;

pub use vertices::{parse_vertices, VertexGenerator};

use serde::Deserialize;
use tracing::info;

use crate::diagnostics::{Report, Subject};
use crate::error::{ConfigError, Result};
use crate::geometry::PolygonLoop;
use crate::layout::{LayerInfo, Layout};
use crate::operations::fillet::{
    AdaptiveRadii, ConflictResolver, FilletConfig, RadiusSpec, DEFAULT_PRECISION,
};
use crate::operations::rings::{expand_ranges, PerRing, RingRange};
use crate::operations::{BuildPolygon, BuildRings, BuildVia, RingSpec, DEFAULT_INNER_ZOOM, DEFAULT_OUTER_ZOOM};
use crate::region::{Quantizer, Region};

/// Document-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Database unit in micrometers.
    pub dbu: f64,
    /// Default for shapes whose fillet does not set `interactive`.
    pub interactive: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dbu: 0.001,
            interactive: false,
        }
    }
}

/// Output cell and layer defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GdsConfig {
    pub cell_name: String,
    pub default_layer: (u16, u16),
}

impl Default for GdsConfig {
    fn default() -> Self {
        Self {
            cell_name: "TOP".to_string(),
            default_layer: (1, 0),
        }
    }
}

/// A scalar or per-vertex radius.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RadiusValue {
    Scalar(f64),
    List(Vec<f64>),
}

impl From<RadiusValue> for RadiusSpec {
    fn from(value: RadiusValue) -> Self {
        match value {
            RadiusValue::Scalar(r) => Self::Uniform(r),
            RadiusValue::List(list) => Self::PerVertex(list),
        }
    }
}

/// Raw `fillet` section of a shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilletRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub radius: Option<f64>,
    pub radii: Option<Vec<f64>>,
    pub convex_radius: Option<RadiusValue>,
    pub concave_radius: Option<RadiusValue>,
    pub precision: Option<f64>,
    pub interactive: Option<bool>,
}

impl FilletRecord {
    /// Resolves the record into a closed [`FilletConfig`].
    ///
    /// A missing or unknown `type` yields [`FilletConfig::None`]; the unknown
    /// case is reported.
    #[must_use]
    pub fn resolve(&self, global: &GlobalConfig, report: &mut Report, subject: &Subject) -> FilletConfig {
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        let interactive = self.interactive.unwrap_or(global.interactive);
        match self.kind.as_deref() {
            None | Some("none") => FilletConfig::None,
            Some("arc") => {
                let radius = match &self.radii {
                    Some(list) => RadiusSpec::PerVertex(list.clone()),
                    None => RadiusSpec::Uniform(self.radius.unwrap_or(0.0)),
                };
                FilletConfig::Uniform {
                    radius,
                    precision,
                    interactive,
                }
            }
            Some("adaptive") => {
                let side = |v: &Option<RadiusValue>| v.clone().map_or(RadiusSpec::Uniform(0.0), RadiusSpec::from);
                FilletConfig::Adaptive {
                    radii: AdaptiveRadii::new(side(&self.convex_radius), side(&self.concave_radius)),
                    precision,
                    interactive,
                }
            }
            Some(other) => {
                report.warn(
                    subject.clone(),
                    format!("unknown fillet type '{other}'; corners left sharp"),
                );
                FilletConfig::None
            }
        }
    }
}

/// Zoom as written: a number, or a list whose entries must all agree.
/// Anything else is kept as [`ZoomValue::Malformed`] and read as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ZoomValue {
    Scalar(f64),
    List(Vec<f64>),
    Malformed(serde_json::Value),
}

impl ZoomValue {
    /// The scalar zoom; malformed values are reported and read as zero.
    #[must_use]
    pub fn resolve(&self, report: &mut Report, subject: &Subject) -> f64 {
        let value = match self {
            Self::Scalar(z) => Some(*z),
            Self::List(list) => match list.split_first() {
                Some((first, rest)) if rest.iter().all(|z| (z - first).abs() < f64::EPSILON) => Some(*first),
                _ => None,
            },
            Self::Malformed(_) => None,
        };
        match value.filter(|z| z.is_finite()) {
            Some(z) => z,
            None => {
                report.warn(subject.clone(), format!("malformed zoom {self:?}; using 0"));
                0.0
            }
        }
    }
}

/// Per-ring width or space as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RingValue {
    Scalar(f64),
    List(Vec<f64>),
    Ranges(Vec<(usize, usize, f64)>),
}

impl RingValue {
    /// # Errors
    ///
    /// Returns [`ConfigError::RingRule`] if range rules do not cover exactly
    /// `count` rings.
    pub fn resolve(&self, field: &'static str, count: usize) -> std::result::Result<PerRing<f64>, ConfigError> {
        match self {
            Self::Scalar(v) => Ok(PerRing::Uniform(*v)),
            Self::List(list) => {
                if list.len() == count {
                    Ok(PerRing::PerRing(list.clone()))
                } else {
                    Err(ConfigError::RingRule {
                        field,
                        reason: format!("list has {} entries, expected {count}", list.len()),
                    })
                }
            }
            Self::Ranges(rules) => {
                let rules: Vec<RingRange> = rules
                    .iter()
                    .map(|&(first, last, value)| RingRange { first, last, value })
                    .collect();
                expand_ranges(field, &rules, count).map(PerRing::PerRing)
            }
        }
    }
}

/// Target layer as written: `[layer, datatype]` or a layer name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayerValue {
    Pair(u16, u16),
    Name(String),
}

/// One entry of `shapes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapeRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub vertices: Option<String>,
    pub vertices_gen: Option<VertexGenerator>,
    pub fillet: Option<FilletRecord>,
    pub zoom: Option<ZoomValue>,
    pub ring_width: Option<RingValue>,
    pub ring_space: Option<RingValue>,
    pub ring_num: Option<usize>,
    pub inner_zoom: Option<f64>,
    pub outer_zoom: Option<f64>,
    pub layer: Option<LayerValue>,
    pub cell: Option<String>,
}

impl ShapeRecord {
    /// The configured name, or `Unnamed_<type>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("Unnamed_{}", self.kind))
    }

    /// Validates the record into a job.
    ///
    /// Recoverable oddities (unknown fillet type, malformed zoom, named
    /// layers) are reported and defaulted.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the shape cannot be built at all.
    pub fn to_job(
        &self,
        global: &GlobalConfig,
        gds: &GdsConfig,
        report: &mut Report,
    ) -> std::result::Result<ShapeJob, ConfigError> {
        let name = self.display_name();
        let subject = Subject::Shape(name.clone());
        let missing = |field: &'static str| ConfigError::MissingField {
            shape: name.clone(),
            field,
        };

        let polygon = match (&self.vertices_gen, &self.vertices) {
            (Some(generator), _) => generator.generate()?,
            (None, Some(text)) => parse_vertices(text)?,
            (None, None) => return Err(missing("vertices")),
        };

        let fillet = self
            .fillet
            .as_ref()
            .map_or(FilletConfig::None, |f| f.resolve(global, report, &subject));
        let zoom = self.zoom.as_ref().map_or(0.0, |z| z.resolve(report, &subject));

        let kind = match self.kind.as_str() {
            "polygon" => ShapeKind::Polygon { zoom },
            "rings" => {
                let count = self.ring_num.ok_or_else(|| missing("ring_num"))?;
                let width = self.ring_width.as_ref().ok_or_else(|| missing("ring_width"))?;
                let space = self.ring_space.as_ref().ok_or_else(|| missing("ring_space"))?;
                ShapeKind::Rings {
                    width: width.resolve("ring_width", count)?,
                    space: space.resolve("ring_space", count)?,
                    count,
                    zoom,
                }
            }
            "via" => ShapeKind::Via {
                inner_zoom: self.inner_zoom.unwrap_or(DEFAULT_INNER_ZOOM),
                outer_zoom: self.outer_zoom.unwrap_or(DEFAULT_OUTER_ZOOM),
            },
            other => return Err(ConfigError::UnknownShape(other.to_string())),
        };

        let default_layer = LayerInfo::new(gds.default_layer.0, gds.default_layer.1);
        let layer = match &self.layer {
            None => default_layer,
            Some(LayerValue::Pair(layer, datatype)) => LayerInfo::new(*layer, *datatype),
            Some(LayerValue::Name(layer_name)) => {
                report.warn(
                    subject.clone(),
                    format!("layer names are not resolved ('{layer_name}'); using the default layer"),
                );
                default_layer
            }
        };

        Ok(ShapeJob {
            name: name.clone(),
            polygon,
            kind,
            fillet,
            layer,
            cell: self.cell.clone().unwrap_or_else(|| gds.cell_name.clone()),
        })
    }
}

/// What to build from a shape's contour.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Polygon {
        zoom: f64,
    },
    Rings {
        width: PerRing<f64>,
        space: PerRing<f64>,
        count: usize,
        zoom: f64,
    },
    Via {
        inner_zoom: f64,
        outer_zoom: f64,
    },
}

/// A validated shape ready to build.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeJob {
    pub name: String,
    pub polygon: PolygonLoop,
    pub kind: ShapeKind,
    pub fillet: FilletConfig,
    pub layer: LayerInfo,
    pub cell: String,
}

impl ShapeJob {
    /// Builds the shape's region.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::error::GeometryError::TangentOverflow`].
    pub fn execute(&self, quantizer: &Quantizer, resolver: &mut dyn ConflictResolver) -> Result<(Region, Report)> {
        match &self.kind {
            ShapeKind::Polygon { zoom } => {
                let shape = BuildPolygon::new(&self.polygon, self.fillet.clone(), *zoom).execute(quantizer, resolver)?;
                Ok((shape.region, shape.report))
            }
            ShapeKind::Rings {
                width,
                space,
                count,
                zoom,
            } => {
                let spec = RingSpec::new(self.polygon.clone(), width.clone(), space.clone(), *count)
                    .fillet(self.fillet.clone())
                    .zoom(*zoom);
                let set = BuildRings::new(spec).execute(quantizer, resolver)?;
                Ok((set.region, set.report))
            }
            ShapeKind::Via { inner_zoom, outer_zoom } => {
                let shape = BuildVia::new(&self.polygon, *inner_zoom, *outer_zoom, self.fillet.clone())
                    .execute(quantizer, resolver)?;
                Ok((shape.region, shape.report))
            }
        }
    }
}

/// A whole configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub global: GlobalConfig,
    pub gds: GdsConfig,
    pub shapes: Vec<ShapeRecord>,
}

impl LayoutConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `json` is not a valid document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(ConfigError::from)?)
    }

    /// The document's database grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `global.dbu` is not positive.
    pub fn quantizer(&self) -> Result<Quantizer> {
        Ok(Quantizer::from_dbu(self.global.dbu).ok_or_else(|| ConfigError::InvalidValue {
            field: "global.dbu",
            reason: format!("must be a positive number, got {}", self.global.dbu),
        })?)
    }

    /// Builds every shape into a new [`Layout`].
    ///
    /// Shapes that fail validation or produce an empty region are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid `global.dbu` and propagates fatal
    /// geometry errors from any shape.
    pub fn build(&self, resolver: &mut dyn ConflictResolver) -> Result<(Layout, Report)> {
        let quantizer = self.quantizer()?;
        let mut layout = Layout::new(quantizer);
        let mut report = Report::new();
        layout.create_cell(&self.gds.cell_name);

        for record in &self.shapes {
            let subject = Subject::Shape(record.display_name());
            let job = match record.to_job(&self.global, &self.gds, &mut report) {
                Ok(job) => job,
                Err(e) => {
                    report.warn(subject, format!("{e}; shape skipped"));
                    continue;
                }
            };

            let (region, shape_report) = job.execute(&quantizer, resolver)?;
            report.absorb(shape_report, Some(&subject));
            if region.is_empty() {
                report.warn(subject, "region is empty; nothing added");
                continue;
            }
            let cell = layout.get_or_create_cell(&job.cell);
            layout.add_region(cell, job.layer, &region)?;
            info!(
                shape = %job.name,
                cell = %job.cell,
                layer = job.layer.layer,
                datatype = job.layer.datatype,
                area = region.area(),
                "shape added"
            );
        }
        Ok((layout, report))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::fillet::ConflictPolicy;
    use approx::assert_abs_diff_eq;

    fn shape(json: &str) -> ShapeRecord {
        serde_json::from_str(json).unwrap()
    }

    fn job(json: &str) -> std::result::Result<ShapeJob, ConfigError> {
        shape(json).to_job(&GlobalConfig::default(), &GdsConfig::default(), &mut Report::new())
    }

    #[test]
    fn defaults() {
        let config = LayoutConfig::from_json("{}").unwrap();
        assert_abs_diff_eq!(config.global.dbu, 0.001);
        assert!(!config.global.interactive);
        assert_eq!(config.gds.cell_name, "TOP");
        assert_eq!(config.gds.default_layer, (1, 0));
        assert!(config.shapes.is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = LayoutConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::MaskringError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn fillet_kinds() {
        let global = GlobalConfig::default();
        let mut report = Report::new();
        let subject = Subject::Loop;
        let arc: FilletRecord = serde_json::from_str(r#"{"type": "arc", "radius": 2, "precision": 0.1}"#).unwrap();
        assert_eq!(
            arc.resolve(&global, &mut report, &subject),
            FilletConfig::Uniform {
                radius: RadiusSpec::Uniform(2.0),
                precision: 0.1,
                interactive: false
            }
        );
        let list: FilletRecord = serde_json::from_str(r#"{"type": "arc", "radii": [1, 2, 3]}"#).unwrap();
        assert!(matches!(
            list.resolve(&global, &mut report, &subject),
            FilletConfig::Uniform { radius: RadiusSpec::PerVertex(_), .. }
        ));
        let adaptive: FilletRecord =
            serde_json::from_str(r#"{"type": "adaptive", "convex_radius": 3, "concave_radius": [1, 2, 3], "interactive": true}"#)
                .unwrap();
        assert_eq!(
            adaptive.resolve(&global, &mut report, &subject),
            FilletConfig::Adaptive {
                radii: AdaptiveRadii::new(RadiusSpec::Uniform(3.0), RadiusSpec::PerVertex(vec![1.0, 2.0, 3.0])),
                precision: DEFAULT_PRECISION,
                interactive: true
            }
        );
        assert!(report.is_empty());
    }

    #[test]
    fn unknown_fillet_type_is_reported() {
        let record: FilletRecord = serde_json::from_str(r#"{"type": "chamfer", "radius": 1}"#).unwrap();
        let mut report = Report::new();
        let config = record.resolve(&GlobalConfig::default(), &mut report, &Subject::Loop);
        assert_eq!(config, FilletConfig::None);
        assert!(report.has_warnings());
    }

    #[test]
    fn zoom_forms() {
        let mut report = Report::new();
        assert_abs_diff_eq!(ZoomValue::Scalar(0.5).resolve(&mut report, &Subject::Loop), 0.5);
        assert_abs_diff_eq!(ZoomValue::List(vec![0.2, 0.2]).resolve(&mut report, &Subject::Loop), 0.2);
        assert!(report.is_empty());
        assert_abs_diff_eq!(ZoomValue::List(vec![0.2, 0.3]).resolve(&mut report, &Subject::Loop), 0.0);
        assert_abs_diff_eq!(ZoomValue::List(vec![]).resolve(&mut report, &Subject::Loop), 0.0);
        assert_eq!(report.warnings().count(), 2);
    }

    #[test]
    fn non_numeric_zoom_is_read_as_zero() {
        let record = shape(r#"{"type": "polygon", "vertices": "0,0:1,0:1,1", "zoom": "abc"}"#);
        assert!(matches!(record.zoom, Some(ZoomValue::Malformed(_))));
        let mut report = Report::new();
        let job = record
            .to_job(&GlobalConfig::default(), &GdsConfig::default(), &mut report)
            .unwrap();
        assert_eq!(job.kind, ShapeKind::Polygon { zoom: 0.0 });
        assert!(report.has_warnings());
    }

    #[test]
    fn ring_values() {
        let scalar: RingValue = serde_json::from_str("10").unwrap();
        assert_eq!(scalar.resolve("ring_width", 3).unwrap(), PerRing::Uniform(10.0));
        let list: RingValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(list.resolve("ring_width", 3).unwrap(), PerRing::PerRing(vec![1.0, 2.0, 3.0]));
        assert!(list.resolve("ring_width", 2).is_err());
        let ranges: RingValue = serde_json::from_str("[[1, 2, 5], [3, 3, 8]]").unwrap();
        assert_eq!(
            ranges.resolve("ring_space", 3).unwrap(),
            PerRing::PerRing(vec![5.0, 5.0, 8.0])
        );
        assert!(ranges.resolve("ring_space", 4).is_err());
    }

    #[test]
    fn rings_job_needs_ring_fields() {
        let err = job(r#"{"name": "r", "type": "rings", "vertices": "0,0:1,0:1,1", "ring_width": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "ring_num", .. }));
    }

    #[test]
    fn unknown_shape_type() {
        let err = job(r#"{"type": "spiral", "vertices": "0,0:1,0:1,1"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownShape(_)));
    }

    #[test]
    fn missing_vertices() {
        let err = job(r#"{"type": "polygon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "vertices", .. }));
    }

    #[test]
    fn via_defaults_and_layer() {
        let job = job(r#"{"name": "v", "type": "via", "vertices": "0,0:4,0:4,4:0,4", "layer": [3, 1], "cell": "VIA"}"#)
            .unwrap();
        assert_eq!(
            job.kind,
            ShapeKind::Via {
                inner_zoom: -1.0,
                outer_zoom: 1.0
            }
        );
        assert_eq!(job.layer, LayerInfo::new(3, 1));
        assert_eq!(job.cell, "VIA");
    }

    #[test]
    fn named_layer_falls_back_to_default() {
        let mut report = Report::new();
        let job = shape(r#"{"type": "polygon", "vertices": "0,0:1,0:1,1", "layer": "metal1"}"#)
            .to_job(&GlobalConfig::default(), &GdsConfig::default(), &mut report)
            .unwrap();
        assert_eq!(job.layer, LayerInfo::new(1, 0));
        assert!(report.has_warnings());
    }

    #[test]
    fn global_interactive_is_inherited() {
        let global = GlobalConfig {
            interactive: true,
            ..GlobalConfig::default()
        };
        let record: FilletRecord = serde_json::from_str(r#"{"type": "arc", "radius": 1}"#).unwrap();
        assert!(record.resolve(&global, &mut Report::new(), &Subject::Loop).is_interactive());
    }

    #[test]
    fn build_skips_bad_shapes() {
        let config = LayoutConfig::from_json(
            r#"{
                "shapes": [
                    {"name": "ok", "type": "polygon", "vertices": "0,0:10,0:10,10:0,10"},
                    {"name": "bad", "type": "polygon", "vertices": "0,0:10,0"}
                ]
            }"#,
        )
        .unwrap();
        let (layout, report) = config.build(&mut ConflictPolicy::Force).unwrap();
        let top = layout.cell_by_name("TOP").unwrap();
        let region = layout.cell(top).unwrap().region(LayerInfo::new(1, 0)).unwrap();
        assert_abs_diff_eq!(region.area(), 100.0, epsilon = 1e-9);
        assert!(report
            .warnings()
            .any(|d| d.subject == Subject::Shape("bad".to_string())));
    }

    #[test]
    fn invalid_dbu_is_rejected() {
        let config = LayoutConfig::from_json(r#"{"global": {"dbu": 0}}"#).unwrap();
        assert!(config.build(&mut ConflictPolicy::Force).is_err());
    }
}
