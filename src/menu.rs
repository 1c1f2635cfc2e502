//! Add-Module Menu

use serde::Serialize;

use crate::modules::{Module, ModuleKind};

/// One entry of the add menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub kind: ModuleKind,
    pub label: &'static str,
}

/// Addable kinds, in menu order. Locked kinds are structural and absent.
pub const ADDABLE_MODULES: [CatalogEntry; 10] = [
    CatalogEntry { kind: ModuleKind::Paragraph, label: "Paragraph" },
    CatalogEntry { kind: ModuleKind::ThreeBullets, label: "Three bullets" },
    CatalogEntry { kind: ModuleKind::ImageSquare, label: "Image 1:1" },
    CatalogEntry { kind: ModuleKind::ImageWide, label: "Image 16:9" },
    CatalogEntry { kind: ModuleKind::Divider, label: "Divider" },
    CatalogEntry { kind: ModuleKind::SimpleCards, label: "Simple cards" },
    CatalogEntry { kind: ModuleKind::ImageCards, label: "Image cards" },
    CatalogEntry { kind: ModuleKind::Quote, label: "Quote" },
    CatalogEntry { kind: ModuleKind::ThreeStats, label: "Three stats" },
    CatalogEntry { kind: ModuleKind::OneStat, label: "One stat" },
];

pub fn is_addable(kind: ModuleKind) -> bool {
    ADDABLE_MODULES.iter().any(|entry| entry.kind == kind)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddModuleMenu {
    open: bool,
}

impl AddModuleMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        &ADDABLE_MODULES
    }

    /// Build a default module of `kind` and close the menu.
    ///
    /// Kinds outside the catalog yield `None` and leave the menu open.
    pub fn choose(&mut self, kind: ModuleKind) -> Option<Module> {
        if !is_addable(kind) {
            tracing::debug!(%kind, "kind not offered by add menu");
            return None;
        }
        self.open = false;
        Some(Module::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_excludes_locked() {
        assert!(ADDABLE_MODULES.iter().all(|e| !e.kind.is_locked()));
        assert_eq!(ADDABLE_MODULES.len(), 10);
    }

    #[test]
    fn test_choose_closes_menu() {
        let mut menu = AddModuleMenu::default();
        menu.open();
        let module = menu.choose(ModuleKind::Quote).unwrap();
        assert_eq!(module.kind(), Some(ModuleKind::Quote));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_choose_locked_is_refused() {
        let mut menu = AddModuleMenu::default();
        menu.open();
        assert!(menu.choose(ModuleKind::Footer).is_none());
        assert!(menu.is_open());
    }

    #[test]
    fn test_toggle_and_cancel() {
        let mut menu = AddModuleMenu::default();
        menu.toggle();
        assert!(menu.is_open());
        menu.cancel();
        assert!(!menu.is_open());
    }
}
