//! On-disk schema of an exported conductor network.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BfemError, Result};

/// Schema identifier of the full conductor-network export.
pub const CONDUCTOR_NETWORK_SCHEMA: &str = "bfem:conductor-network:v1";

/// Schema identifier of the centerline export.
pub const CENTERLINES_SCHEMA: &str = "bfem:centerlines:v1";

/// Parameter key holding the wire cross-section width in millimeters.
pub const WIRE_WIDTH_PARAM: &str = "wireWidth_mm";

/// Recognized document schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// `bfem:conductor-network:v1`
    ConductorNetwork,
    /// `bfem:centerlines:v1`
    Centerlines,
}

impl SchemaKind {
    /// Resolve a declared schema identifier.
    pub fn from_id(id: Option<&str>) -> Result<Self> {
        match id {
            Some(CONDUCTOR_NETWORK_SCHEMA) => Ok(Self::ConductorNetwork),
            Some(CENTERLINES_SCHEMA) => Ok(Self::Centerlines),
            Some(other) => Err(BfemError::schema(format!("unexpected schema '{}'", other))),
            None => Err(BfemError::schema("document declares no schema")),
        }
    }

    /// The identifier as written in the document.
    pub fn id(&self) -> &'static str {
        match self {
            Self::ConductorNetwork => CONDUCTOR_NETWORK_SCHEMA,
            Self::Centerlines => CENTERLINES_SCHEMA,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Length unit declared by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    M,
}

impl LengthUnit {
    /// Resolve a declared unit tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "mm" => Ok(Self::Mm),
            "m" => Ok(Self::M),
            other => Err(BfemError::schema(format!("unexpected units '{}'", other))),
        }
    }

    /// Multiplier converting this unit to meters.
    pub fn to_meters(&self) -> f64 {
        match self {
            Self::Mm => 1.0e-3,
            Self::M => 1.0,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => write!(f, "mm"),
            Self::M => write!(f, "m"),
        }
    }
}

/// Document as deserialized, before any validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    pub schema: Option<String>,
    pub units: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    pub paths: Option<Vec<RawPath>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPath {
    pub name: Option<String>,
    #[serde(default)]
    pub points: Vec<Value>,
}

/// Read one `[x, y, z]` entry.
pub(crate) fn parse_point(value: &Value, path: &str, index: usize) -> Result<[f64; 3]> {
    let coords = value
        .as_array()
        .filter(|c| c.len() == 3)
        .ok_or_else(|| {
            BfemError::schema(format!(
                "path '{}' point {} is not an [x, y, z] array",
                path, index
            ))
        })?;

    let mut out = [0.0; 3];
    for (slot, c) in out.iter_mut().zip(coords) {
        *slot = c.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
            BfemError::schema(format!(
                "path '{}' point {} has a non-numeric coordinate",
                path, index
            ))
        })?;
    }
    Ok(out)
}
