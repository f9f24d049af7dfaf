//! Loader for exported conductor networks.
//!
//! The geometry generator writes a JSON document of the form:
//!
//! ```text
//! {
//!   "schema": "bfem:conductor-network:v1",   // or "bfem:centerlines:v1"
//!   "units": "mm",                            // "mm" | "m"
//!   "params": { "wireWidth_mm": 1.0, ... },
//!   "paths": [
//!     { "name": "coil", "points": [[x, y, z], [x, y, z], ...] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Loading validates the schema identifier and unit tag and converts every
//! coordinate to meters. Centerline exports must declare their units;
//! conductor-network exports without a tag are taken as mm. The wire width
//! is always read from `params.wireWidth_mm`, and the remaining generator
//! parameters are kept as exported.

mod schema;

pub use schema::{
    LengthUnit, SchemaKind, CENTERLINES_SCHEMA, CONDUCTOR_NETWORK_SCHEMA, WIRE_WIDTH_PARAM,
};

use serde_json::{Map, Value};

use crate::error::{BfemError, Result};
use crate::geometry::Point3;
use schema::{parse_point, RawDocument};

/// One continuous polyline from the export.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorPath {
    /// Path name (`path-<index>` when the export leaves it out)
    pub name: String,
    /// Ordered points in meters
    pub points: Vec<Point3>,
}

/// A loaded conductor network.
#[derive(Debug, Clone)]
pub struct ConductorNetwork {
    /// Declared schema
    pub schema: SchemaKind,
    /// Declared units of the source document
    pub units: LengthUnit,
    /// All paths, coordinates in meters
    pub paths: Vec<ConductorPath>,
    /// Wire cross-section width in meters, if the export carries it
    pub wire_width: Option<f64>,
    /// Generator parameters as exported
    pub params: Map<String, Value>,
}

impl ConductorNetwork {
    /// The path consumed by the capacitance estimator.
    ///
    /// Fails if it has fewer than two points.
    pub fn primary_path(&self) -> Result<&ConductorPath> {
        let path = self
            .paths
            .first()
            .ok_or_else(|| BfemError::data("network has no paths"))?;
        if path.points.len() < 2 {
            return Err(BfemError::data(format!(
                "path '{}' has {} point(s), at least 2 are required",
                path.name,
                path.points.len()
            )));
        }
        Ok(path)
    }

    /// Wire width in meters, failing if the export does not carry a positive one.
    pub fn require_wire_width(&self) -> Result<f64> {
        match self.wire_width {
            Some(w) if w > 0.0 => Ok(w),
            Some(w) => Err(BfemError::data(format!(
                "wire width must be > 0, got {} m",
                w
            ))),
            None => Err(BfemError::data(format!(
                "params.{} is missing",
                WIRE_WIDTH_PARAM
            ))),
        }
    }

    /// Total number of points over all paths.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }
}

/// Parse a conductor network from JSON text.
pub fn parse(input: &str) -> Result<ConductorNetwork> {
    let raw: RawDocument = serde_json::from_str(input)?;

    let schema = SchemaKind::from_id(raw.schema.as_deref())?;
    let units = match (raw.units.as_deref(), schema) {
        (Some(tag), _) => LengthUnit::from_tag(tag)?,
        // The conductor-network exporter writes native mm without a tag.
        (None, SchemaKind::ConductorNetwork) => {
            tracing::warn!("document declares no units, assuming mm");
            LengthUnit::Mm
        }
        (None, SchemaKind::Centerlines) => {
            return Err(BfemError::schema("document declares no units"));
        }
    };
    let params = raw.params.unwrap_or_default();
    let scale = units.to_meters();

    let wire_width = match params.get(WIRE_WIDTH_PARAM) {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_f64()
                .ok_or_else(|| {
                    BfemError::schema(format!("params.{} is not a number", WIRE_WIDTH_PARAM))
                })?
                * 1.0e-3,
        ),
    };

    let raw_paths = raw
        .paths
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BfemError::data("no paths in document"))?;

    let mut paths = Vec::with_capacity(raw_paths.len());
    for (idx, raw_path) in raw_paths.into_iter().enumerate() {
        let name = raw_path.name.unwrap_or_else(|| format!("path-{}", idx));
        let points = raw_path
            .points
            .iter()
            .enumerate()
            .map(|(i, v)| {
                parse_point(v, &name, i).map(|[x, y, z]| Point3::new(x, y, z) * scale)
            })
            .collect::<Result<Vec<_>>>()?;
        paths.push(ConductorPath { name, points });
    }

    let network = ConductorNetwork {
        schema,
        units,
        paths,
        wire_width,
        params,
    };
    tracing::debug!(
        schema = %network.schema,
        paths = network.paths.len(),
        points = network.point_count(),
        "loaded conductor network"
    );
    Ok(network)
}

/// Load a conductor network from a file.
pub fn load_file(path: &std::path::Path) -> Result<ConductorNetwork> {
    let content = std::fs::read_to_string(path).map_err(|e| BfemError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
