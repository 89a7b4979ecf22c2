//! Focusable list primitives
//!
//! [`SelectableList`] tracks one focused item; [`MultiSelectableList`] adds an
//! independent set of toggled indices on top of the same focus rules. Both are
//! total: every operation on an empty list is a no-op.

use std::collections::BTreeSet;

/// Ordered items with a single wrapping focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableList<T> {
    items: Vec<T>,
    /// Only meaningful while `items` is non-empty; always `< items.len()` then.
    focus: usize,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            focus: 0,
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, focus: 0 }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` for an empty list.
    pub fn focus_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.focus)
    }

    pub fn focused(&self) -> Option<&T> {
        self.items.get(self.focus)
    }

    pub fn focused_mut(&mut self) -> Option<&mut T> {
        self.items.get_mut(self.focus)
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.focus = (self.focus + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.items.is_empty() {
            self.focus = (self.focus + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn focus_first(&mut self) {
        self.focus = 0;
    }

    /// Replaces the items, clamping focus into the new range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.focus = self.focus.min(self.items.len().saturating_sub(1));
    }

    /// Moves focus to the first item equal to `item`, if any.
    pub fn focus_item(&mut self, item: &T)
    where
        T: PartialEq,
    {
        if let Some(index) = self.items.iter().position(|i| i == item) {
            self.focus = index;
        }
    }

    /// Items paired with whether each one has focus.
    pub fn iter_focus(&self) -> impl Iterator<Item = (&T, bool)> {
        let focus = self.focus_index();
        self.items
            .iter()
            .enumerate()
            .map(move |(index, item)| (item, Some(index) == focus))
    }
}

/// A [`SelectableList`] with per-item toggles
///
/// Selection is positional, so replacing the items drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectableList<T> {
    list: SelectableList<T>,
    selected: BTreeSet<usize>,
}

impl<T> Default for MultiSelectableList<T> {
    fn default() -> Self {
        Self {
            list: SelectableList::default(),
            selected: BTreeSet::new(),
        }
    }
}

impl<T> MultiSelectableList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            list: SelectableList::new(items),
            selected: BTreeSet::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.list.focus_index()
    }

    pub fn focused(&self) -> Option<&T> {
        self.list.focused()
    }

    pub fn next(&mut self) {
        self.list.next();
    }

    pub fn prev(&mut self) {
        self.list.prev();
    }

    pub fn focus_first(&mut self) {
        self.list.focus_first();
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.list.set_items(items);
        self.selected.clear();
    }

    /// Flips selection of the focused item.
    pub fn toggle(&mut self) {
        if let Some(index) = self.list.focus_index()
            && !self.selected.remove(&index)
        {
            self.selected.insert(index);
        }
    }

    pub fn none_selected(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected indices. Callers needing a particular order must sort.
    pub fn selected_indexes(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Items paired with (focused, selected) flags.
    pub fn iter_marks(&self) -> impl Iterator<Item = (&T, bool, bool)> {
        let selected = &self.selected;
        self.list
            .iter_focus()
            .enumerate()
            .map(move |(index, (item, focused))| (item, focused, selected.contains(&index)))
    }
}
