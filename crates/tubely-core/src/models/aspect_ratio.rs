use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Target width/height ratio for 16:9 footage.
pub const LANDSCAPE_RATIO: f64 = 1.77;
/// Target width/height ratio for 9:16 footage.
pub const PORTRAIT_RATIO: f64 = 0.55;
/// Half-width of each classification band. Bands are inclusive at both edges.
pub const RATIO_TOLERANCE: f64 = 0.2;

// Absorbs float error so that e.g. 1.57 (exactly 0.2 below target) stays in band.
const RATIO_EPSILON: f64 = 1e-9;

/// Orientation class of a video stream, used as the first segment of its storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

impl AspectRatio {
    /// Classify a width/height ratio.
    pub fn from_ratio(ratio: f64) -> Self {
        if within_tolerance(ratio, LANDSCAPE_RATIO) {
            AspectRatio::Landscape
        } else if within_tolerance(ratio, PORTRAIT_RATIO) {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

fn within_tolerance(value: f64, target: f64) -> bool {
    (value - target).abs() <= RATIO_TOLERANCE + RATIO_EPSILON
}
