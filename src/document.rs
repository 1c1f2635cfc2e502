//! Stacker Document - Ordered Module List
//!
//! Every edit returns a new module list; nothing here mutates a document
//! that a caller still holds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::hashing::compute_fingerprint;
use crate::modules::{HeadingSize, ImageRef, Module, ModuleContent, ModuleId, ModuleKind};
use crate::{StudioError, DOCUMENT_SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

fn default_schema_version() -> String {
    DOCUMENT_SCHEMA_VERSION.to_string()
}

impl Default for Document {
    fn default() -> Self {
        Self::from_modules(vec![])
    }
}

impl Document {
    pub fn from_modules(modules: Vec<Module>) -> Self {
        Self {
            schema_version: default_schema_version(),
            modules,
        }
    }

    /// Fresh stacker document: logo chip and header first, footer last.
    pub fn new_stacker(heading: &str, footer_text: &str) -> Self {
        Self::from_modules(vec![
            Module::with_content(
                crate::modules::new_module_id(),
                ModuleContent::LogoChip {
                    logo: ImageRef::default(),
                    label: None,
                },
            ),
            Module::with_content(
                crate::modules::new_module_id(),
                ModuleContent::Header {
                    heading: heading.to_string(),
                    heading_size: HeadingSize::Large,
                    subheader: None,
                    cta: None,
                },
            ),
            Module::with_content(
                crate::modules::new_module_id(),
                ModuleContent::Footer {
                    text: footer_text.to_string(),
                    legal: None,
                },
            ),
        ])
    }

    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Ids offered to the drag controller. Locked modules never appear here.
    pub fn sortable_ids(&self) -> Vec<ModuleId> {
        sortable_ids(&self.modules)
    }

    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        compute_fingerprint(&self.modules)
    }

    /// Same document with a different module list.
    pub fn with_modules(&self, modules: Vec<Module>) -> Self {
        Self {
            schema_version: self.schema_version.clone(),
            modules,
        }
    }
}

pub fn index_of(modules: &[Module], id: &str) -> Option<usize> {
    modules.iter().position(|m| m.id == id)
}

pub fn sortable_ids(modules: &[Module]) -> Vec<ModuleId> {
    modules
        .iter()
        .filter(|m| !m.is_locked())
        .map(|m| m.id.clone())
        .collect()
}

/// Position a newly added module lands at: end of the list, but in front
/// of a trailing footer.
pub fn append_position(modules: &[Module]) -> usize {
    match modules.last() {
        Some(last) if last.kind() == Some(ModuleKind::Footer) => modules.len() - 1,
        _ => modules.len(),
    }
}

pub fn append_module(modules: &[Module], module: Module) -> Vec<Module> {
    let at = append_position(modules);
    let mut next = Vec::with_capacity(modules.len() + 1);
    next.extend_from_slice(&modules[..at]);
    next.push(module);
    next.extend_from_slice(&modules[at..]);
    next
}

/// List without the module `id`. Missing ids leave the list as is.
pub fn remove_module(modules: &[Module], id: &str) -> Vec<Module> {
    modules.iter().filter(|m| m.id != id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(id: &str) -> Module {
        Module::with_content(id, ModuleKind::Paragraph.default_content())
    }

    #[test]
    fn test_new_stacker_layout() {
        let doc = Document::new_stacker("Spring launch", "Acme Inc.");
        let kinds: Vec<_> = doc.modules.iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            vec![Some(ModuleKind::LogoChip), Some(ModuleKind::Header), Some(ModuleKind::Footer)]
        );
        assert!(doc.sortable_ids().is_empty());
    }

    #[test]
    fn test_append_goes_before_footer() {
        let doc = Document::new_stacker("h", "f");
        let next = append_module(&doc.modules, paragraph("p"));
        assert_eq!(next.len(), 4);
        assert_eq!(next[2].id, "p");
        assert_eq!(next[3].kind(), Some(ModuleKind::Footer));
    }

    #[test]
    fn test_append_without_footer_pushes() {
        let modules = vec![paragraph("a")];
        let next = append_module(&modules, paragraph("b"));
        assert_eq!(next.last().map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let modules = vec![paragraph("a"), paragraph("b")];
        assert_eq!(remove_module(&modules, "zzz"), modules);
    }

    #[test]
    fn test_schema_version_defaults() {
        let doc: Document = serde_json::from_str(r#"{"modules": []}"#).unwrap();
        assert_eq!(doc.schema_version, DOCUMENT_SCHEMA_VERSION);
    }
}
