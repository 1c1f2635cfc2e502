//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to a verdict.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::FailureMode;
use crate::document::Document;
use crate::modules::ModuleKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub module_id: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub module_count: usize,
    pub schema_version: String,
}

impl ValidationResult {
    fn new(document: &Document, valid: bool, violations: Vec<ValidationViolation>) -> Self {
        Self {
            valid,
            violations,
            module_count: document.len(),
            schema_version: document.schema_version.clone(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, document: &Document) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Module ids must be unique; they are the sortable identity.
pub struct UniqueIdsRule;

impl ValidationRule for UniqueIdsRule {
    fn name(&self) -> &'static str { "unique_ids" }

    fn validate(&self, document: &Document) -> Vec<ValidationViolation> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut violations = vec![];
        for module in &document.modules {
            if !seen.insert(module.id.as_str()) && reported.insert(module.id.as_str()) {
                violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: "Duplicate module id".to_string(),
                    module_id: Some(module.id.clone()),
                    expected: Some("unique id".to_string()),
                    actual: Some(module.id.clone()),
                    remediation: vec!["Assign a fresh id to the duplicated module".to_string()],
                });
            }
        }
        violations
    }
}

/// Logo chip and header lead the document, footer closes it.
///
/// Locked modules cannot be dragged, so one placed out of line stays there.
pub struct LockedPlacementRule;

impl ValidationRule for LockedPlacementRule {
    fn name(&self) -> &'static str { "locked_placement" }

    fn validate(&self, document: &Document) -> Vec<ValidationViolation> {
        let modules = &document.modules;
        let first_sortable = modules.iter().position(|m| !m.is_locked());
        let last_sortable = modules.iter().rposition(|m| !m.is_locked());
        let mut violations = vec![];

        for (index, module) in modules.iter().enumerate() {
            let misplaced = match module.kind() {
                Some(ModuleKind::LogoChip) | Some(ModuleKind::Header) => {
                    first_sortable.is_some_and(|first| index > first)
                }
                Some(ModuleKind::Footer) => last_sortable.is_some_and(|last| index < last),
                _ => false,
            };
            if misplaced {
                let (expected, remediation) = if module.kind() == Some(ModuleKind::Footer) {
                    ("after all content modules", "Move the footer to the end of the document")
                } else {
                    ("before all content modules", "Move the module to the top of the document")
                };
                violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Warning,
                    message: format!("Locked {} module out of place", module.content.kind().map(|k| k.tag()).unwrap_or("unknown")),
                    module_id: Some(module.id.clone()),
                    expected: Some(expected.to_string()),
                    actual: Some(format!("position {}", index)),
                    remediation: vec![remediation.to_string()],
                });
            }
        }
        violations
    }
}

pub struct KnownTypesRule;

impl ValidationRule for KnownTypesRule {
    fn name(&self) -> &'static str { "known_types" }

    fn validate(&self, document: &Document) -> Vec<ValidationViolation> {
        document
            .modules
            .iter()
            .filter(|m| m.kind().is_none())
            .map(|m| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: "Unknown module type will not render".to_string(),
                module_id: Some(m.id.clone()),
                expected: None,
                actual: None,
                remediation: vec!["Remove the module or upgrade the engine".to_string()],
            })
            .collect()
    }
}

pub struct EmptyDocumentRule;

impl ValidationRule for EmptyDocumentRule {
    fn name(&self) -> &'static str { "empty_document" }

    fn validate(&self, document: &Document) -> Vec<ValidationViolation> {
        let message = if document.is_empty() {
            "Document has no modules"
        } else if document.sortable_ids().is_empty() {
            "Document has no content modules"
        } else {
            return vec![];
        };
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Info,
            message: message.to_string(),
            module_id: None,
            expected: None,
            actual: None,
            remediation: vec!["Add a module from the add menu".to_string()],
        }]
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UniqueIdsRule),
                Box::new(LockedPlacementRule),
                Box::new(KnownTypesRule),
                Box::new(EmptyDocumentRule),
            ],
        }
    }

    pub fn validate(&self, document: &Document, failure_mode: FailureMode) -> ValidationResult {
        let mut all_violations = vec![];

        for rule in &self.rules {
            all_violations.extend(rule.validate(document));
        }

        let has_errors = all_violations.iter()
            .any(|v| v.severity == ViolationSeverity::Error);

        match failure_mode {
            FailureMode::Block => ValidationResult::new(document, !has_errors, all_violations),
            FailureMode::Warn => ValidationResult::new(document, true, all_violations),
            FailureMode::Log => {
                for v in &all_violations {
                    tracing::warn!(rule = %v.rule, module_id = ?v.module_id, "{}", v.message);
                }
                ValidationResult::new(document, true, all_violations)
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
