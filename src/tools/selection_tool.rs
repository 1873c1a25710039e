use egui::{Pos2, Rect};
use log::{debug, info};

use crate::command::Command;
use crate::geometry::{ViewTransform, box_from_corners};
use crate::selection::{MIN_LASSO_POINTS, MIN_POLYGON_POINTS, Selection, ToolKind};

/// Distance in screen pixels within which a polygon click closes the shape
pub const CLOSE_THRESHOLD_PX: f32 = 10.0;

/// Drawing state of the selection tool
#[derive(Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    DrawingRect { start: Pos2, current: Pos2 },
    DrawingEllipse { start: Pos2, current: Pos2 },
    DrawingPolygon { points: Vec<Pos2> },
    DrawingLasso { points: Vec<Pos2> },
}

// Manual Debug so long point buffers don't flood the log
impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::DrawingRect { start, current } => f
                .debug_struct("DrawingRect")
                .field("start", start)
                .field("current", current)
                .finish(),
            Self::DrawingEllipse { start, current } => f
                .debug_struct("DrawingEllipse")
                .field("start", start)
                .field("current", current)
                .finish(),
            Self::DrawingPolygon { points } => f
                .debug_struct("DrawingPolygon")
                .field("points", &points.len())
                .finish(),
            Self::DrawingLasso { points } => f
                .debug_struct("DrawingLasso")
                .field("points", &points.len())
                .finish(),
        }
    }
}

/// Live shape shown while a selection is being drawn
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPreview {
    /// Box being dragged out by the rectangle or ellipse tool
    Box { kind: ToolKind, rect: Rect },
    /// Open polyline of a polygon or lasso still being drawn
    Path { kind: ToolKind, points: Vec<Pos2> },
}

/// Turns pointer input (already mapped into image space) into committed selections.
///
/// The tool only owns in-progress input. Committed selections leave as
/// [`Command::CommitSelection`] and live in the document.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    active: ToolKind,
    state: SelectionState,
    close_threshold_px: f32,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new(ToolKind::default())
    }
}

impl SelectionTool {
    pub fn new(active: ToolKind) -> Self {
        Self {
            active,
            state: SelectionState::Idle,
            close_threshold_px: CLOSE_THRESHOLD_PX,
        }
    }

    pub fn with_close_threshold(mut self, px: f32) -> Self {
        self.close_threshold_px = px;
        self
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn current_state_name(&self) -> &'static str {
        match self.state {
            SelectionState::Idle => "Idle",
            SelectionState::DrawingRect { .. } => "DrawingRect",
            SelectionState::DrawingEllipse { .. } => "DrawingEllipse",
            SelectionState::DrawingPolygon { .. } => "DrawingPolygon",
            SelectionState::DrawingLasso { .. } => "DrawingLasso",
        }
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    /// Switches the active tool. Anything drawn but not committed is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.active {
            return;
        }
        if self.is_drawing() {
            debug!("Abandoning {:?} on tool switch", self.state);
        }
        info!("Selection tool changed: {:?} -> {:?}", self.active, tool);
        self.active = tool;
        self.state = SelectionState::Idle;
    }

    /// Drops any in-progress drawing without committing it
    pub fn cancel(&mut self) {
        if self.is_drawing() {
            debug!("Cancelled {:?}", self.state);
        }
        self.state = SelectionState::Idle;
    }

    /// Points buffered by an unfinished polygon or lasso
    pub fn in_progress_points(&self) -> &[Pos2] {
        match &self.state {
            SelectionState::DrawingPolygon { points } | SelectionState::DrawingLasso { points } => {
                points
            }
            _ => &[],
        }
    }

    pub fn preview(&self) -> Option<SelectionPreview> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::DrawingRect { start, current } => Some(SelectionPreview::Box {
                kind: ToolKind::Rectangle,
                rect: box_from_corners(*start, *current),
            }),
            SelectionState::DrawingEllipse { start, current } => Some(SelectionPreview::Box {
                kind: ToolKind::Ellipse,
                rect: box_from_corners(*start, *current),
            }),
            SelectionState::DrawingPolygon { points } => Some(SelectionPreview::Path {
                kind: ToolKind::Polygon,
                points: points.clone(),
            }),
            SelectionState::DrawingLasso { points } => Some(SelectionPreview::Path {
                kind: ToolKind::Lasso,
                points: points.clone(),
            }),
        }
    }

    /// Handle pointer press at `pos` (image space). `view` supplies the
    /// current scale so the polygon close distance stays constant on screen.
    pub fn on_pointer_down(&mut self, pos: Pos2, view: &ViewTransform) -> Option<Command> {
        match self.active {
            ToolKind::Rectangle => {
                self.state = SelectionState::DrawingRect { start: pos, current: pos };
                None
            }
            ToolKind::Ellipse => {
                self.state = SelectionState::DrawingEllipse { start: pos, current: pos };
                None
            }
            ToolKind::Lasso => {
                self.state = SelectionState::DrawingLasso { points: vec![pos] };
                None
            }
            ToolKind::Polygon => self.add_polygon_point(pos, view),
        }
    }

    fn add_polygon_point(&mut self, pos: Pos2, view: &ViewTransform) -> Option<Command> {
        let mut points = match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::DrawingPolygon { points } => points,
            _ => Vec::new(),
        };

        // Closing needs a full triangle already placed; the closing click is not a vertex
        if points.len() >= MIN_POLYGON_POINTS {
            let threshold = view.screen_len_to_image(self.close_threshold_px);
            if points[0].distance(pos) < threshold {
                info!("Polygon closed with {} points", points.len());
                return Some(Command::CommitSelection(Selection::Polygon { points }));
            }
        }

        points.push(pos);
        debug!("Polygon point {} at {:?}", points.len(), pos);
        self.state = SelectionState::DrawingPolygon { points };
        None
    }

    /// Handle pointer drag while the button is held
    pub fn on_pointer_move(&mut self, pos: Pos2) -> Option<Command> {
        match &mut self.state {
            SelectionState::DrawingRect { current, .. }
            | SelectionState::DrawingEllipse { current, .. } => {
                *current = pos;
            }
            SelectionState::DrawingLasso { points } => points.push(pos),
            SelectionState::Idle | SelectionState::DrawingPolygon { .. } => {}
        }
        None
    }

    /// Handle pointer release, committing box and lasso selections
    pub fn on_pointer_up(&mut self, _pos: Pos2) -> Option<Command> {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::DrawingRect { start, current } => {
                let rect = box_from_corners(start, current);
                info!("Rectangle selection committed: {:?}", rect);
                Some(Command::CommitSelection(Selection::Rectangle { rect }))
            }
            SelectionState::DrawingEllipse { start, current } => {
                let rect = box_from_corners(start, current);
                info!("Ellipse selection committed: {:?}", rect);
                Some(Command::CommitSelection(Selection::Ellipse { rect }))
            }
            SelectionState::DrawingLasso { points } => {
                if points.len() >= MIN_LASSO_POINTS {
                    info!("Lasso selection committed with {} points", points.len());
                    Some(Command::CommitSelection(Selection::Lasso { points }))
                } else {
                    debug!("Ignoring single-point lasso");
                    None
                }
            }
            // Polygons are built from clicks; release does nothing
            polygon @ SelectionState::DrawingPolygon { .. } => {
                self.state = polygon;
                None
            }
            SelectionState::Idle => None,
        }
    }

    /// Handle a double click, which finishes a polygon with enough points
    pub fn on_double_click(&mut self) -> Option<Command> {
        match &self.state {
            SelectionState::DrawingPolygon { points } if points.len() >= MIN_POLYGON_POINTS => {
                let points = points.clone();
                self.state = SelectionState::Idle;
                info!("Polygon finished by double click with {} points", points.len());
                Some(Command::CommitSelection(Selection::Polygon { points }))
            }
            _ => None,
        }
    }
}
