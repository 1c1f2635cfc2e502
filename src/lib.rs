//! Stacker Core - Module Document Editing
//!
//! # Ground Rules
//! 1. Module ids are unique and never reassigned
//! 2. Locked modules (logo chip, header, footer) are never sortable
//! 3. Edits produce new lists; nothing is mutated in place
//! 4. Stale or self drops are no-ops, never errors
//! 5. Unknown module types render nothing

pub mod modules;
pub mod document;
pub mod reorder;
pub mod drag;
pub mod selection;
pub mod menu;
pub mod render;
pub mod overlay;
pub mod editor;
pub mod config;
pub mod validation;
pub mod hashing;
pub mod pipeline;

pub use modules::{Module, ModuleContent, ModuleId, ModuleKind};
pub use document::Document;
pub use reorder::{array_move, reorder_modules};
pub use drag::{DragController, DragEvent, DragInput, DragKey, Point, Rect, SortableItem};
pub use selection::{EditorHost, Selection};
pub use menu::{AddModuleMenu, ADDABLE_MODULES};
pub use render::{MarkupRenderer, ModuleRenderer};
pub use overlay::DragOverlay;
pub use editor::{EditorInput, StackerEditor};
pub use config::{EditorConfig, FailureMode};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use hashing::{compute_fingerprint, canonical_json};
pub use pipeline::{DocumentHost, EditOutcome, EditPipeline, EditRequest, ReplayScript, StudioError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DOCUMENT_SCHEMA_VERSION: &str = "1.0.0";
