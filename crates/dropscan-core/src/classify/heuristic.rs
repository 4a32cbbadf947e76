use crate::detection::Boundary;
use crate::features::{circularity, solidity};

/// Circularity above which a drop is a pearl.
pub const PEARL_MIN_CIRCULARITY: f64 = 0.85;
/// Circularity above which a non-pearl drop is elliptical.
pub const ELLIPTICAL_MIN_CIRCULARITY: f64 = 0.70;
/// Solidity below which a drop is irregular.
pub const IRREGULAR_MAX_SOLIDITY: f64 = 0.70;
/// Aspect ratios outside `[SNAKE_MIN_ASPECT, SNAKE_MAX_ASPECT]` are snakes.
pub const SNAKE_MIN_ASPECT: f64 = 0.33;
pub const SNAKE_MAX_ASPECT: f64 = 3.0;

/// Shape vocabulary of the rule-based classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicShape {
    Pearl,
    Elliptical,
    Irregular,
    Snake,
    Ring,
    Unknown,
}

impl HeuristicShape {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pearl => "Pearl (Circular)",
            Self::Elliptical => "Elliptical",
            Self::Irregular => "Irregular",
            Self::Snake => "Snake",
            Self::Ring => "Ring",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for HeuristicShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Geometry the decision list looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeMetrics {
    pub perimeter: f64,
    pub circularity: f64,
    pub solidity: f64,
    pub aspect_ratio: f64,
}

impl ShapeMetrics {
    /// Measure a boundary directly, without going through the descriptor.
    pub fn measure(boundary: &Boundary) -> Self {
        let area = boundary.area();
        let perimeter = boundary.perimeter();
        Self {
            perimeter,
            circularity: circularity(area, perimeter),
            solidity: solidity(area, boundary.convex_hull_area()),
            aspect_ratio: boundary
                .bounding_rect()
                .map_or(0.0, |rect| rect.aspect_ratio()),
        }
    }
}

/// Ordered decision list; the first matching rule wins.
pub fn classify_metrics(m: &ShapeMetrics) -> HeuristicShape {
    if m.perimeter == 0.0 {
        return HeuristicShape::Unknown;
    }
    if m.circularity > PEARL_MIN_CIRCULARITY {
        HeuristicShape::Pearl
    } else if m.circularity > ELLIPTICAL_MIN_CIRCULARITY {
        HeuristicShape::Elliptical
    } else if m.solidity < IRREGULAR_MAX_SOLIDITY {
        HeuristicShape::Irregular
    } else if m.aspect_ratio > SNAKE_MAX_ASPECT || m.aspect_ratio < SNAKE_MIN_ASPECT {
        HeuristicShape::Snake
    } else {
        HeuristicShape::Ring
    }
}

/// Classify a boundary with the rule-based decision list.
pub fn classify_heuristic(boundary: &Boundary) -> HeuristicShape {
    classify_metrics(&ShapeMetrics::measure(boundary))
}
