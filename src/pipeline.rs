//! Edit Pipeline - Single Entry Point for Scripted Edits
//!
//! Every edit checks the document's schema version and validates the result
//! before it is handed back.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use chrono::{DateTime, Utc};
use std::time::Instant;

use crate::config::EditorConfig;
use crate::document::{append_module, remove_module, Document};
use crate::drag::DragEvent;
use crate::editor::{column_layout, EditorInput, StackerEditor};
use crate::menu::is_addable;
use crate::modules::{Module, ModuleId, ModuleKind};
use crate::reorder::reorder_modules;
use crate::selection::EditorHost;
use crate::validation::{ValidationResult, Validator};
use crate::DOCUMENT_SCHEMA_VERSION;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module {0} is locked and cannot be reordered")]
    LockedModule(String),

    #[error("Module type {0} cannot be added")]
    NotAddable(ModuleKind),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Document schema {0} is not supported, engine reads {1}")]
    UnsupportedSchema(String, String),

    #[error("Invalid schema version: {0}")]
    InvalidSchemaVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditRequest {
    Reorder { active_id: ModuleId, over_id: ModuleId },
    Add { kind: ModuleKind },
    Delete { id: ModuleId },
}

#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    pub document: Document,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_id: Option<ModuleId>,
    pub fingerprint: String,
    pub applied_at: DateTime<Utc>,
    pub validation: ValidationResult,
}

/// A list of editor inputs replayed against a column layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    pub inputs: Vec<EditorInput>,
}

fn default_row_height() -> f32 { 100.0 }

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub document: Document,
    pub selected: Option<ModuleId>,
    pub events: Vec<DragEvent>,
    pub fingerprint: String,
}

/// Owner of a document that applies the editor's requests to it.
#[derive(Debug, Clone, Default)]
pub struct DocumentHost {
    pub document: Document,
    pub selected: Option<ModuleId>,
}

impl DocumentHost {
    pub fn new(document: Document) -> Self {
        Self { document, selected: None }
    }
}

impl EditorHost for DocumentHost {
    fn modules_reordered(&mut self, modules: Vec<Module>) {
        self.document = self.document.with_modules(modules);
    }

    fn module_selected(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    fn module_deleted(&mut self, id: &str) {
        let modules = remove_module(&self.document.modules, id);
        self.document = self.document.with_modules(modules);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    fn module_added(&mut self, module: Module) {
        let modules = append_module(&self.document.modules, module);
        self.document = self.document.with_modules(modules);
    }
}

pub struct EditPipeline {
    config: EditorConfig,
    validator: Validator,
}

impl EditPipeline {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            validator: Validator::new(),
        }
    }

    /// The only validation entry point.
    pub fn validate(&self, document: &Document) -> Result<ValidationResult, StudioError> {
        check_schema_version(document)?;
        Ok(self.validator.validate(document, self.config.failure_mode))
    }

    #[tracing::instrument(skip(self, document), fields(modules = document.len()))]
    pub fn apply(&self, document: &Document, request: &EditRequest) -> Result<EditOutcome, StudioError> {
        self.ensure_valid(document)?;

        let mut added_id = None;
        let modules = match request {
            EditRequest::Reorder { active_id, over_id } => {
                for id in [active_id, over_id] {
                    if document.get(id).is_none() {
                        return Err(StudioError::ModuleNotFound(id.clone()));
                    }
                }
                let sortable = document.sortable_ids();
                for id in [active_id, over_id] {
                    if !sortable.contains(id) {
                        return Err(StudioError::LockedModule(id.clone()));
                    }
                }
                reorder_modules(&document.modules, active_id, over_id)
            }
            EditRequest::Add { kind } => {
                if !is_addable(*kind) {
                    return Err(StudioError::NotAddable(*kind));
                }
                let module = Module::new(*kind);
                added_id = Some(module.id.clone());
                Some(append_module(&document.modules, module))
            }
            EditRequest::Delete { id } => {
                if document.get(id).is_none() {
                    return Err(StudioError::ModuleNotFound(id.clone()));
                }
                Some(remove_module(&document.modules, id))
            }
        };

        let changed = modules.is_some();
        let document = match modules {
            Some(modules) => document.with_modules(modules),
            None => document.clone(),
        };
        let validation = self.ensure_valid(&document)?;

        Ok(EditOutcome {
            fingerprint: document.fingerprint()?,
            document,
            changed,
            added_id,
            applied_at: Utc::now(),
            validation,
        })
    }

    /// Drive a fresh editor with `script`, applying its requests to `document`.
    #[tracing::instrument(skip_all, fields(inputs = script.inputs.len()))]
    pub fn replay(&self, document: &Document, script: &ReplayScript) -> Result<ReplayOutcome, StudioError> {
        self.ensure_valid(document)?;

        let mut editor = StackerEditor::new(&self.config);
        let mut host = DocumentHost::new(document.clone());
        let mut events = vec![];
        let width = self.config.content_width as f32;

        for input in &script.inputs {
            let layout = column_layout(&host.document, width, script.row_height);
            let snapshot = host.document.clone();
            events.extend(editor.handle(input, &snapshot, &layout, &mut host, Instant::now()));
        }

        self.ensure_valid(&host.document)?;
        Ok(ReplayOutcome {
            fingerprint: host.document.fingerprint()?,
            selected: editor.selection().selected().map(str::to_string),
            document: host.document,
            events,
        })
    }

    fn ensure_valid(&self, document: &Document) -> Result<ValidationResult, StudioError> {
        let validation = self.validate(document)?;
        if !validation.valid {
            let messages: Vec<_> = validation.violations.iter()
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            return Err(StudioError::ValidationFailed(messages.join("; ")));
        }
        Ok(validation)
    }
}

impl Default for EditPipeline {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

/// Documents from a newer major schema, or a newer minor, are refused.
pub fn check_schema_version(document: &Document) -> Result<(), StudioError> {
    let supported = semver::Version::parse(DOCUMENT_SCHEMA_VERSION)
        .map_err(|_| StudioError::InvalidSchemaVersion(DOCUMENT_SCHEMA_VERSION.into()))?;
    let actual = semver::Version::parse(&document.schema_version)
        .map_err(|_| StudioError::InvalidSchemaVersion(document.schema_version.clone()))?;

    if actual.major != supported.major || actual > supported {
        return Err(StudioError::UnsupportedSchema(
            document.schema_version.clone(),
            DOCUMENT_SCHEMA_VERSION.to_string(),
        ));
    }
    Ok(())
}
