//! Selection & Deletion Controller

use crate::modules::ModuleId;

/// Receiver for the document edits the editor requests.
///
/// The host owns the module list; the editor never mutates it in place.
pub trait EditorHost {
    /// The list after a completed drag-and-drop.
    fn modules_reordered(&mut self, modules: Vec<crate::modules::Module>);
    fn module_selected(&mut self, id: &str);
    fn module_deleted(&mut self, id: &str);
    /// A module built by the add menu; the host appends it.
    fn module_added(&mut self, module: crate::modules::Module);
}

/// The single module currently open for editing, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ModuleId>,
}

impl Selection {
    pub fn new(selected: Option<ModuleId>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Not checked against the document: ids come from rendered modules.
    pub fn select(&mut self, id: &str, host: &mut impl EditorHost) {
        self.selected = Some(id.to_string());
        host.module_selected(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Ask the host to remove `id`, dropping the selection if it pointed there.
    pub fn delete(&mut self, id: &str, host: &mut impl EditorHost) {
        if self.is_selected(id) {
            self.selected = None;
        }
        tracing::debug!(id, "module delete requested");
        host.module_deleted(id);
    }
}
