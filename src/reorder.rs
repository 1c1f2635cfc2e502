//! Reorder Engine
//!
//! Moves a single element from one index to another. Elements between the
//! two positions shift by one to close the gap; this is not a swap.

use crate::document::index_of;
use crate::modules::Module;

/// Return a copy of `list` with the element at `from` relocated to `to`.
///
/// Out-of-range indices leave the list unchanged.
pub fn array_move<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// Move the module `active_id` to the position currently held by `over_id`.
///
/// Returns `None` when the drop is a no-op: same id, or either id no longer
/// in the list (the document changed while the drag was in flight).
pub fn reorder_modules(modules: &[Module], active_id: &str, over_id: &str) -> Option<Vec<Module>> {
    if active_id == over_id {
        tracing::debug!(id = active_id, "drop onto self ignored");
        return None;
    }
    let (Some(from), Some(to)) = (index_of(modules, active_id), index_of(modules, over_id)) else {
        tracing::debug!(active_id, over_id, "stale drag ids, reorder skipped");
        return None;
    };
    Some(array_move(modules, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleKind;

    fn ids(modules: &[Module]) -> Vec<&str> {
        modules.iter().map(|m| m.id.as_str()).collect()
    }

    fn doc() -> Vec<Module> {
        vec![
            Module::with_content("H", ModuleKind::Header.default_content()),
            Module::with_content("A", ModuleKind::Paragraph.default_content()),
            Module::with_content("B", ModuleKind::ImageSquare.default_content()),
            Module::with_content("F", ModuleKind::Footer.default_content()),
        ]
    }

    #[test]
    fn test_array_move_forward_and_back() {
        let list = vec![0, 1, 2, 3, 4];
        assert_eq!(array_move(&list, 1, 3), vec![0, 2, 3, 1, 4]);
        assert_eq!(array_move(&list, 3, 0), vec![3, 0, 1, 2, 4]);
    }

    #[test]
    fn test_array_move_out_of_range() {
        let list = vec!['a', 'b'];
        assert_eq!(array_move(&list, 5, 0), list);
        assert_eq!(array_move(&list, 0, 2), list);
    }

    #[test]
    fn test_reorder_swaps_neighbours() {
        let next = reorder_modules(&doc(), "A", "B").unwrap();
        assert_eq!(ids(&next), vec!["H", "B", "A", "F"]);
    }

    #[test]
    fn test_self_drop_is_noop() {
        assert!(reorder_modules(&doc(), "A", "A").is_none());
    }

    #[test]
    fn test_stale_ids_are_noop() {
        assert!(reorder_modules(&doc(), "gone", "B").is_none());
        assert!(reorder_modules(&doc(), "A", "gone").is_none());
    }
}
