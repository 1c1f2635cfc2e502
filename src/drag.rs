//! Sortable Drag Controller
//!
//! Turns raw pointer and keyboard input over the sortable module list into
//! drag events. The controller is an explicit state machine:
//!
//! - `Idle`: nothing pressed.
//! - `Pending`: pointer is down on a handle but has not travelled the
//!   activation distance yet. Releasing here is a click, not a drag.
//! - `Dragging`: a module is lifted; every move recomputes the drop target.
//!
//! # Invariants
//!
//! 1. A press produces either `Click` or a drag sequence, never both.
//! 2. Every `DragStart` is followed by exactly one `Drop` or `Cancel`.
//! 3. `active_id` and `over_id` are both cleared after `Drop` or `Cancel`.
//! 4. Only ids present in the supplied sortable items can start a drag.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::modules::ModuleId;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A rendered sortable module and where it currently sits on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortableItem {
    pub id: ModuleId,
    pub rect: Rect,
}

impl SortableItem {
    pub fn new(id: impl Into<ModuleId>, rect: Rect) -> Self {
        Self { id: id.into(), rect }
    }
}

/// Id of the item whose center is nearest to `point`. Ties go to the
/// earlier item.
pub fn closest_center<'a>(items: &'a [SortableItem], point: Point) -> Option<&'a ModuleId> {
    items
        .iter()
        .map(|item| (item, item.rect.center().distance(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(item, _)| &item.id)
}

// ---------------------------------------------------------------------------
// Input and output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKey {
    /// Space or Enter: pick up the focused module, or drop it.
    Activate,
    Up,
    Down,
    Left,
    Right,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragInput {
    PointerDown { id: ModuleId, pos: Point },
    PointerMove { pos: Point },
    PointerUp { pos: Point },
    Key {
        key: DragKey,
        #[serde(default)]
        focused: Option<ModuleId>,
    },
    /// Pointer capture lost or window blurred.
    FocusLost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragEvent {
    /// Press and release without reaching the activation distance.
    Click { id: ModuleId },
    DragStart { active_id: ModuleId },
    DragOver { active_id: ModuleId, over_id: Option<ModuleId> },
    Drop { active_id: ModuleId, over_id: Option<ModuleId> },
    Cancel { active_id: ModuleId },
}

impl DragEvent {
    /// `(active, over)` when this drop should move a module.
    pub fn reorder_intent(&self) -> Option<(&str, &str)> {
        match self {
            DragEvent::Drop {
                active_id,
                over_id: Some(over_id),
            } if active_id != over_id => Some((active_id.as_str(), over_id.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Pointer,
    Keyboard,
}

/// Live state of a drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub active_id: ModuleId,
    pub over_id: Option<ModuleId>,
    pub sensor: Sensor,
    /// Center of the lifted module when the drag began.
    pub origin_center: Point,
    /// Where the pointer (or keyboard cursor) was when the drag began.
    pub origin: Point,
    pub pointer: Point,
}

impl DragSession {
    /// Center of the lifted module at the current pointer position.
    #[must_use]
    pub fn dragged_center(&self) -> Point {
        self.origin_center
            .offset(self.pointer.x - self.origin.x, self.pointer.y - self.origin.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Pending { id: ModuleId, origin: Point },
    Dragging(DragSession),
}

// ---------------------------------------------------------------------------
// DragController
// ---------------------------------------------------------------------------

/// Stateful controller for one sortable list.
///
/// Call [`process`](DragController::process) for each input, passing the
/// sortable items as currently laid out.
#[derive(Debug, Clone)]
pub struct DragController {
    activation_distance: f32,
    keyboard_step: f32,
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl DragController {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            activation_distance: config.activation_distance,
            keyboard_step: config.keyboard_step,
            state: DragState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.session().map(|s| s.active_id.as_str())
    }

    pub fn over_id(&self) -> Option<&str> {
        self.session().and_then(|s| s.over_id.as_deref())
    }

    /// Drop any pending press or drag without emitting events.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Feed one input, returning the drag events it produced.
    pub fn process(&mut self, input: &DragInput, items: &[SortableItem]) -> Vec<DragEvent> {
        let mut out = Vec::with_capacity(2);
        match input {
            DragInput::PointerDown { id, pos } => self.on_pointer_down(id, *pos, items),
            DragInput::PointerMove { pos } => self.on_pointer_move(*pos, items, &mut out),
            DragInput::PointerUp { .. } => self.on_pointer_up(&mut out),
            DragInput::Key { key, focused } => self.on_key(*key, focused.as_deref(), items, &mut out),
            DragInput::FocusLost => self.cancel(&mut out),
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Internal handlers
// ---------------------------------------------------------------------------

impl DragController {
    fn on_pointer_down(&mut self, id: &str, pos: Point, items: &[SortableItem]) {
        if !matches!(self.state, DragState::Idle) {
            return;
        }
        if !items.iter().any(|item| item.id == id) {
            tracing::trace!(id, "press on non-sortable module");
            return;
        }
        self.state = DragState::Pending {
            id: id.to_string(),
            origin: pos,
        };
    }

    fn on_pointer_move(&mut self, pos: Point, items: &[SortableItem], out: &mut Vec<DragEvent>) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Pending { id, origin } => {
                if origin.distance(pos) < self.activation_distance {
                    return;
                }
                let Some(item) = items.iter().find(|item| item.id == *id) else {
                    // The pressed module went away before the drag started.
                    self.state = DragState::Idle;
                    return;
                };
                let session = DragSession {
                    active_id: id.clone(),
                    over_id: None,
                    sensor: Sensor::Pointer,
                    origin_center: item.rect.center(),
                    origin: *origin,
                    pointer: pos,
                };
                self.begin(session, items, out);
            }
            DragState::Dragging(session) => {
                if session.sensor != Sensor::Pointer {
                    return;
                }
                session.pointer = pos;
                Self::update_over(session, items, out);
            }
        }
    }

    fn on_pointer_up(&mut self, out: &mut Vec<DragEvent>) {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => {}
            DragState::Pending { id, .. } => out.push(DragEvent::Click { id }),
            DragState::Dragging(session) if session.sensor == Sensor::Pointer => {
                out.push(DragEvent::Drop {
                    active_id: session.active_id,
                    over_id: session.over_id,
                });
            }
            keyboard => self.state = keyboard,
        }
    }

    fn on_key(
        &mut self,
        key: DragKey,
        focused: Option<&str>,
        items: &[SortableItem],
        out: &mut Vec<DragEvent>,
    ) {
        if key == DragKey::Escape {
            self.cancel(out);
            return;
        }

        match &mut self.state {
            DragState::Idle => {
                if key != DragKey::Activate {
                    return;
                }
                let Some(item) = focused.and_then(|id| items.iter().find(|item| item.id == id)) else {
                    return;
                };
                let center = item.rect.center();
                let session = DragSession {
                    active_id: item.id.clone(),
                    over_id: None,
                    sensor: Sensor::Keyboard,
                    origin_center: center,
                    origin: center,
                    pointer: center,
                };
                self.begin(session, items, out);
            }
            DragState::Pending { .. } => {}
            DragState::Dragging(session) => {
                if session.sensor != Sensor::Keyboard {
                    return;
                }
                let step = self.keyboard_step;
                let (dx, dy) = match key {
                    DragKey::Up => (0.0, -step),
                    DragKey::Down => (0.0, step),
                    DragKey::Left => (-step, 0.0),
                    DragKey::Right => (step, 0.0),
                    DragKey::Activate => {
                        if let DragState::Dragging(session) =
                            std::mem::replace(&mut self.state, DragState::Idle)
                        {
                            out.push(DragEvent::Drop {
                                active_id: session.active_id,
                                over_id: session.over_id,
                            });
                        }
                        return;
                    }
                    DragKey::Escape => return,
                };
                session.pointer = session.pointer.offset(dx, dy);
                Self::update_over(session, items, out);
            }
        }
    }

    fn begin(&mut self, mut session: DragSession, items: &[SortableItem], out: &mut Vec<DragEvent>) {
        tracing::debug!(active_id = %session.active_id, sensor = ?session.sensor, "drag started");
        out.push(DragEvent::DragStart {
            active_id: session.active_id.clone(),
        });
        Self::update_over(&mut session, items, out);
        self.state = DragState::Dragging(session);
    }

    fn update_over(session: &mut DragSession, items: &[SortableItem], out: &mut Vec<DragEvent>) {
        session.over_id = closest_center(items, session.dragged_center()).cloned();
        tracing::trace!(active_id = %session.active_id, over_id = ?session.over_id, "drag over");
        out.push(DragEvent::DragOver {
            active_id: session.active_id.clone(),
            over_id: session.over_id.clone(),
        });
    }

    fn cancel(&mut self, out: &mut Vec<DragEvent>) {
        if let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle) {
            tracing::debug!(active_id = %session.active_id, "drag cancelled");
            out.push(DragEvent::Cancel {
                active_id: session.active_id,
            });
        }
    }
}
