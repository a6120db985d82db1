use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in canvas space (relative to the canvas' top-left corner)
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

impl InputLocation {
    pub fn in_canvas(position: Pos2) -> Self {
        Self {
            position,
            is_in_canvas: true,
        }
    }
}

/// Input events the editor reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

impl InputEvent {
    /// Helper to check if an input event occurred within the canvas
    pub fn is_in_canvas(&self) -> bool {
        match self {
            InputEvent::PointerDown { location, .. }
            | InputEvent::PointerUp { location, .. }
            | InputEvent::PointerMove { location, .. } => location.is_in_canvas,
            InputEvent::KeyDown { .. } => false,
        }
    }

    /// Primary-button press at a canvas position
    pub fn press(position: Pos2) -> Self {
        InputEvent::PointerDown {
            location: InputLocation::in_canvas(position),
            button: PointerButton::Primary,
        }
    }

    /// Pointer motion with the primary button held
    pub fn drag(position: Pos2) -> Self {
        InputEvent::PointerMove {
            location: InputLocation::in_canvas(position),
            held_buttons: vec![PointerButton::Primary],
        }
    }

    /// Primary-button release at a canvas position
    pub fn release(position: Pos2) -> Self {
        InputEvent::PointerUp {
            location: InputLocation::in_canvas(position),
            button: PointerButton::Primary,
        }
    }

    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Creates an InputLocation from a screen position
    fn make_location(&self, pos: Pos2, canvas_hovered: bool) -> InputLocation {
        InputLocation {
            position: (pos - self.canvas_rect.min).to_pos2(),
            is_in_canvas: canvas_hovered && self.canvas_rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// `canvas_hovered` should be false while a menu or window covers the
    /// canvas, so clicks on it don't start tool gestures.
    pub fn process_input(&mut self, ctx: &Context, canvas_hovered: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let keyboard_free = !ctx.wants_keyboard_input();

        ctx.input(|input| {
            if let Some(pos) = input.pointer.hover_pos() {
                // If position changed, this is a move
                if Some(pos) != self.last_pointer_pos {
                    let held_buttons = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle]
                        .into_iter()
                        .filter(|button| input.pointer.button_down(*button))
                        .collect();
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos, canvas_hovered),
                        held_buttons,
                    });
                }
                self.last_pointer_pos = Some(pos);
            } else {
                self.last_pointer_pos = None;
            }

            // Releases may happen outside the window, so fall back to the last known position.
            let pointer_pos = input.pointer.hover_pos().or(input.pointer.interact_pos());
            for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                if input.pointer.button_pressed(button) {
                    if let Some(pos) = pointer_pos {
                        events.push(InputEvent::PointerDown {
                            location: self.make_location(pos, canvas_hovered),
                            button,
                        });
                    }
                }
                if input.pointer.button_released(button) {
                    if let Some(pos) = pointer_pos {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos, canvas_hovered),
                            button,
                        });
                    }
                }
            }

            if keyboard_free {
                for event in &input.raw.events {
                    if let egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } = event
                    {
                        events.push(InputEvent::KeyDown {
                            key: *key,
                            modifiers: *modifiers,
                        });
                    }
                }
            }
        });

        events
    }
}
