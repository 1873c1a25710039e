use egui::{Context, Key, PointerButton, Pos2, Rect};

use crate::session::EditorSession;

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position relative to the top-left corner of the canvas
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Canvas input, already filtered down to what the selection tools consume
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { location: InputLocation },
    /// Pointer moved
    PointerMove { location: InputLocation },
    /// Primary button was released
    PointerUp { location: InputLocation },
    /// Primary button was double-clicked
    DoubleClick { location: InputLocation },
    /// Escape was pressed
    Cancel,
}

/// Handles converting raw egui input into canvas-relative [`InputEvent`]s
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    pressed_in_canvas: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect: Rect::NOTHING,
            pressed_in_canvas: false,
        }
    }

    /// Update the canvas rectangle (e.g. if the window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: pos - self.canvas_rect.min.to_vec2(),
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let pointer = &input.pointer;

            if pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = pointer.interact_pos() {
                    let location = self.make_location(pos);
                    // Presses outside the canvas belong to other panels
                    if location.is_in_canvas {
                        self.pressed_in_canvas = true;
                        events.push(InputEvent::PointerDown { location });
                    }
                }
            }

            if let Some(pos) = pointer.latest_pos() {
                if Some(pos) != self.last_pointer_pos {
                    let location = self.make_location(pos);
                    // A drag that started on the canvas keeps reporting when it leaves
                    if location.is_in_canvas || self.pressed_in_canvas {
                        events.push(InputEvent::PointerMove { location });
                    }
                }
                self.last_pointer_pos = Some(pos);
            }

            if pointer.button_released(PointerButton::Primary) && self.pressed_in_canvas {
                self.pressed_in_canvas = false;
                if let Some(pos) = pointer.latest_pos().or(self.last_pointer_pos) {
                    events.push(InputEvent::PointerUp {
                        location: self.make_location(pos),
                    });
                }
            }

            if pointer.button_double_clicked(PointerButton::Primary) {
                if let Some(pos) = pointer.latest_pos() {
                    let location = self.make_location(pos);
                    if location.is_in_canvas {
                        events.push(InputEvent::DoubleClick { location });
                    }
                }
            }

            if input.key_pressed(Key::Escape) {
                events.push(InputEvent::Cancel);
            }
        });

        events
    }
}

/// Routes one input event to the session's selection tool
pub fn route_event(event: &InputEvent, session: &mut EditorSession) {
    match event {
        InputEvent::PointerDown { location } => session.pointer_down(location.position),
        InputEvent::PointerMove { location } => session.pointer_move(location.position),
        InputEvent::PointerUp { location } => session.pointer_up(location.position),
        InputEvent::DoubleClick { .. } => session.double_click(),
        InputEvent::Cancel => session.cancel_drawing(),
    }
}
