use std::collections::BTreeSet;

use tracing::debug;

use crate::task::TaskId;

/// Checked rows of a task view. Holds identifiers only; ids that leave the
/// filtered view stay selected until cleared or purged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    pub fn toggle(&mut self, id: &TaskId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
        debug!(id = %id, selected = self.ids.len(), "toggled task selection");
    }

    /// Toggle-all: clears when the selection is exactly `visible`, otherwise
    /// replaces it with `visible`.
    pub fn select_all(&mut self, visible: &[TaskId]) {
        if self.equals(visible) {
            self.ids.clear();
        } else {
            self.ids = visible.iter().cloned().collect();
        }
        debug!(selected = self.ids.len(), "toggled select-all");
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that are no longer visible.
    pub fn retain_visible(&mut self, visible: &[TaskId]) {
        let before = self.ids.len();
        self.ids.retain(|id| visible.contains(id));
        if self.ids.len() != before {
            debug!(
                purged = before - self.ids.len(),
                "purged selection outside the view"
            );
        }
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.ids.iter()
    }

    /// Header checkbox state.
    pub fn all_selected(&self, visible: &[TaskId]) -> bool {
        !visible.is_empty() && self.equals(visible)
    }

    fn equals(&self, visible: &[TaskId]) -> bool {
        let visible: BTreeSet<&TaskId> = visible.iter().collect();
        visible.len() == self.ids.len() && self.ids.iter().all(|id| visible.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::task::TaskId;

    fn ids(raw: &[&str]) -> Vec<TaskId> {
        raw.iter().map(|id| TaskId::from(*id)).collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::default();
        let id = TaskId::from("7");
        selection.toggle(&id);
        assert!(selection.contains(&id));
        selection.toggle(&id);
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_twice_returns_to_empty() {
        let visible = ids(&["1", "2", "3"]);
        let mut selection = Selection::default();

        selection.select_all(&visible);
        assert_eq!(selection.len(), 3);
        assert!(selection.all_selected(&visible));

        selection.select_all(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_replaces_a_partial_or_stale_selection() {
        let visible = ids(&["1", "2"]);
        let mut selection = Selection::default();
        selection.toggle(&TaskId::from("1"));
        selection.toggle(&TaskId::from("9"));

        selection.select_all(&visible);

        assert!(selection.all_selected(&visible));
        assert!(!selection.contains(&TaskId::from("9")));
    }

    #[test]
    fn empty_view_is_never_all_selected() {
        let selection = Selection::default();
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn retain_visible_purges_hidden_ids() {
        let mut selection = Selection::default();
        selection.select_all(&ids(&["1", "2", "3"]));
        selection.retain_visible(&ids(&["2"]));
        assert_eq!(selection.ids().cloned().collect::<Vec<_>>(), ids(&["2"]));
    }
}
