//! Edge classification labels for crease-pattern style documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph_error::GraphError;

/// Classification of an edge, following the single-letter document
/// convention: boundary, mountain, valley, flat, unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeAssignment {
    #[serde(rename = "B")]
    Boundary,
    #[serde(rename = "M")]
    Mountain,
    #[serde(rename = "V")]
    Valley,
    #[serde(rename = "F")]
    Flat,
    #[serde(rename = "U")]
    Unassigned,
}

impl EdgeAssignment {
    /// The single-letter document label.
    pub const fn letter(self) -> &'static str {
        match self {
            EdgeAssignment::Boundary => "B",
            EdgeAssignment::Mountain => "M",
            EdgeAssignment::Valley => "V",
            EdgeAssignment::Flat => "F",
            EdgeAssignment::Unassigned => "U",
        }
    }

    /// Labels that mark a crease rather than an operational fold:
    /// flat and unassigned.
    pub const fn is_mark(self) -> bool {
        matches!(self, EdgeAssignment::Flat | EdgeAssignment::Unassigned)
    }
}

impl Default for EdgeAssignment {
    fn default() -> Self {
        EdgeAssignment::Unassigned
    }
}

impl fmt::Display for EdgeAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for EdgeAssignment {
    type Err = GraphError;

    /// Case-insensitive parse of the single-letter label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" | "b" => Ok(EdgeAssignment::Boundary),
            "M" | "m" => Ok(EdgeAssignment::Mountain),
            "V" | "v" => Ok(EdgeAssignment::Valley),
            "F" | "f" => Ok(EdgeAssignment::Flat),
            "U" | "u" => Ok(EdgeAssignment::Unassigned),
            _ => Err(GraphError::UnknownAssignment(s.to_string())),
        }
    }
}
