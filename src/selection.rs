use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

/// A committed selection region, in image-space coordinates.
///
/// Rectangle and Ellipse boxes are always normalized so `min` is the
/// top-left corner. Polygon and Lasso are closed point sequences: the edge
/// from the last point back to the first is part of the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Rectangle { rect: Rect },
    Ellipse { rect: Rect },
    Polygon { points: Vec<Pos2> },
    Lasso { points: Vec<Pos2> },
}

/// The tool that produced (or would produce) a selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Rectangle,
    Ellipse,
    Polygon,
    Lasso,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Polygon,
        ToolKind::Lasso,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle Select",
            Self::Ellipse => "Ellipse Select",
            Self::Polygon => "Polygon Select",
            Self::Lasso => "Lasso Select",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Rectangle => "⬜",
            Self::Ellipse => "⭕",
            Self::Polygon => "⬟",
            Self::Lasso => "➰",
        }
    }
}

/// Minimum number of points for a polygon to enclose any area
pub const MIN_POLYGON_POINTS: usize = 3;
/// Minimum number of points for a lasso path to be kept
pub const MIN_LASSO_POINTS: usize = 2;

impl Selection {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Rectangle { .. } => ToolKind::Rectangle,
            Self::Ellipse { .. } => ToolKind::Ellipse,
            Self::Polygon { .. } => ToolKind::Polygon,
            Self::Lasso { .. } => ToolKind::Lasso,
        }
    }

    /// Whether this selection satisfies the point-count rules for its shape
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Rectangle { rect } | Self::Ellipse { rect } => {
                rect.width() >= 0.0 && rect.height() >= 0.0
            }
            Self::Polygon { points } => points.len() >= MIN_POLYGON_POINTS,
            Self::Lasso { points } => points.len() >= MIN_LASSO_POINTS,
        }
    }

    /// Axis-aligned bounding box of the shape
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rectangle { rect } | Self::Ellipse { rect } => *rect,
            Self::Polygon { points } | Self::Lasso { points } => {
                Rect::from_points(points)
            }
        }
    }

    pub fn points(&self) -> Option<&[Pos2]> {
        match self {
            Self::Polygon { points } | Self::Lasso { points } => Some(points),
            _ => None,
        }
    }
}
