//! Stacker Editor
//!
//! Wires the drag controller, selection, add menu and overlay to one
//! document. The editor reads the document it is handed and reports every
//! change to the host as a new value.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::drag::{DragController, DragEvent, DragInput, Point, SortableItem};
use crate::menu::{AddModuleMenu, CatalogEntry};
use crate::modules::{ModuleId, ModuleKind};
use crate::overlay::{DragOverlay, OverlayFrame};
use crate::render::{MarkupRenderer, ModuleRenderer};
use crate::reorder::reorder_modules;
use crate::selection::{EditorHost, Selection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorInput {
    Drag(DragInput),
    Select { id: ModuleId },
    Delete { id: ModuleId },
    OpenMenu,
    CancelMenu,
    AddModule { kind: ModuleKind },
}

/// One module as it appears in the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleView<O> {
    pub id: ModuleId,
    pub content: O,
    pub sortable: bool,
    pub selected: bool,
    /// Lifted into the overlay; the in-place copy is drawn faded.
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView<O> {
    pub modules: Vec<ModuleView<O>>,
    pub overlay: Option<OverlayFrame<O>>,
    pub menu: Option<&'static [CatalogEntry]>,
}

pub struct StackerEditor<R: ModuleRenderer = MarkupRenderer> {
    renderer: R,
    drag: DragController,
    selection: Selection,
    menu: AddModuleMenu,
    overlay: DragOverlay,
}

impl StackerEditor<MarkupRenderer> {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_renderer(config, MarkupRenderer)
    }
}

impl<R: ModuleRenderer> StackerEditor<R> {
    pub fn with_renderer(config: &EditorConfig, renderer: R) -> Self {
        Self {
            renderer,
            drag: DragController::new(config),
            selection: Selection::default(),
            menu: AddModuleMenu::default(),
            overlay: DragOverlay::new(config),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Adopt a selection made outside the editor (or cleared by the host).
    pub fn set_selected(&mut self, id: Option<ModuleId>) {
        self.selection = Selection::new(id);
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn menu(&self) -> &AddModuleMenu {
        &self.menu
    }

    pub fn overlay(&self) -> &DragOverlay {
        &self.overlay
    }

    /// Route one input. `layout` is where each rendered module sits; locked
    /// modules in it are ignored.
    pub fn handle(
        &mut self,
        input: &EditorInput,
        document: &Document,
        layout: &[SortableItem],
        host: &mut impl EditorHost,
        now: Instant,
    ) -> Vec<DragEvent> {
        match input {
            EditorInput::Drag(drag_input) => {
                let sortable = sortable_layout(document, layout);
                let events = self.drag.process(drag_input, &sortable);
                for event in &events {
                    self.apply(event, document, &sortable, host, now);
                }
                events
            }
            EditorInput::Select { id } => {
                self.selection.select(id, host);
                vec![]
            }
            EditorInput::Delete { id } => {
                if self.drag.active_id() == Some(id.as_str()) {
                    tracing::debug!(%id, "dragged module deleted, drag dropped");
                    self.drag.reset();
                    self.overlay.hide();
                }
                self.selection.delete(id, host);
                vec![]
            }
            EditorInput::OpenMenu => {
                self.menu.open();
                vec![]
            }
            EditorInput::CancelMenu => {
                self.menu.cancel();
                vec![]
            }
            EditorInput::AddModule { kind } => {
                if let Some(module) = self.menu.choose(*kind) {
                    tracing::debug!(id = %module.id, %kind, "module added");
                    host.module_added(module);
                }
                vec![]
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.overlay.tick(now);
    }

    pub fn view(&self, document: &Document, now: Instant) -> EditorView<R::Output> {
        let active = self.drag.active_id();
        let modules = document
            .modules
            .iter()
            .filter_map(|module| {
                let content = self.renderer.render(module)?;
                Some(ModuleView {
                    id: module.id.clone(),
                    content,
                    sortable: !module.is_locked(),
                    selected: self.selection.is_selected(&module.id),
                    dimmed: active == Some(module.id.as_str()),
                })
            })
            .collect();

        EditorView {
            modules,
            overlay: self.overlay.render(&self.renderer, now),
            menu: self.menu.is_open().then(|| self.menu.entries()),
        }
    }

    fn apply(
        &mut self,
        event: &DragEvent,
        document: &Document,
        sortable: &[SortableItem],
        host: &mut impl EditorHost,
        now: Instant,
    ) {
        match event {
            DragEvent::Click { id } => self.selection.select(id, host),
            DragEvent::DragStart { active_id } => {
                if let Some(module) = document.get(active_id) {
                    let position = self.overlay_position(sortable);
                    self.overlay.lift(module.clone(), position);
                }
            }
            DragEvent::DragOver { .. } => {
                let position = self.overlay_position(sortable);
                self.overlay.follow(position);
            }
            DragEvent::Drop { active_id, over_id } => {
                let slot = over_id.as_deref().unwrap_or(active_id.as_str());
                let target = rect_origin(sortable, slot).or_else(|| rect_origin(sortable, active_id));
                match target {
                    Some(to) => self.overlay.settle(to, now),
                    None => self.overlay.hide(),
                }
                if let Some((active, over)) = event.reorder_intent() {
                    if let Some(modules) = reorder_modules(&document.modules, active, over) {
                        tracing::debug!(active, over, "modules reordered");
                        host.modules_reordered(modules);
                    }
                }
            }
            DragEvent::Cancel { .. } => self.overlay.hide(),
        }
    }

    /// Top-left of the lifted module at the current pointer position.
    fn overlay_position(&self, sortable: &[SortableItem]) -> Point {
        let Some(session) = self.drag.session() else {
            return Point::default();
        };
        let origin = rect_origin(sortable, &session.active_id).unwrap_or_default();
        origin.offset(session.pointer.x - session.origin.x, session.pointer.y - session.origin.y)
    }
}

fn rect_origin(items: &[SortableItem], id: &str) -> Option<Point> {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| Point::new(item.rect.x, item.rect.y))
}

/// The part of `layout` the drag controller may see: sortable modules only.
pub fn sortable_layout(document: &Document, layout: &[SortableItem]) -> Vec<SortableItem> {
    let ids = document.sortable_ids();
    layout
        .iter()
        .filter(|item| ids.contains(&item.id))
        .cloned()
        .collect()
}

/// Lay modules out as a single column of equal-height rows.
pub fn column_layout(document: &Document, width: f32, row_height: f32) -> Vec<SortableItem> {
    document
        .modules
        .iter()
        .enumerate()
        .map(|(i, module)| {
            SortableItem::new(
                module.id.clone(),
                crate::drag::Rect::new(0.0, i as f32 * row_height, width, row_height),
            )
        })
        .collect()
}
