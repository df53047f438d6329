use std::collections::BTreeSet;

use crate::menu::item::MenuItem;

/// Result of a multi-select toggle attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added { reached_cap: bool },
    Removed,
    Rejected,
}

/// Everything one menu session operates on. Created fresh per invocation,
/// mutated only by the engine, discarded (or inspected) by the caller when
/// the session returns.
pub struct MenuState {
    pub title: String,
    pub aux_lines: Vec<String>,
    pub items: Vec<MenuItem>,
    pub cursor: usize,
    pub selected: BTreeSet<usize>,
    pub multi_select: bool,
    /// Selection cap in multi-select mode; 0 means no cap (and therefore no
    /// auto-commit; the set is committed with Select).
    pub max_selections: usize,
    pub cancellable: bool,
}

impl MenuState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            aux_lines: Vec::new(),
            items: Vec::new(),
            cursor: 0,
            selected: BTreeSet::new(),
            multi_select: false,
            max_selections: 0,
            cancellable: true,
        }
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn aux_line(mut self, line: impl Into<String>) -> Self {
        self.aux_lines.push(line.into());
        self
    }

    pub fn multi(mut self, max_selections: usize) -> Self {
        self.multi_select = true;
        self.max_selections = max_selections;
        self
    }

    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    pub fn start_at(mut self, index: usize) -> Self {
        self.cursor = index;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&MenuItem> {
        self.items.get(self.cursor)
    }

    /// Defensive clamp against item lists mutated behind the session's back
    /// (a reused state object). Keeps `cursor` in range instead of raising.
    pub fn clamp_cursor(&mut self) {
        if !self.items.is_empty() && self.cursor >= self.items.len() {
            self.cursor = self.items.len() - 1;
        }
        self.selected.retain(|&i| i < self.items.len());
    }

    /// Move the cursor, clamped at both ends. Returns whether the index
    /// actually changed; a boundary no-op must not fire the move cue.
    pub fn move_by(&mut self, delta: isize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() - 1;
        let target = self.cursor.saturating_add_signed(delta).min(last);
        if target == self.cursor {
            return false;
        }
        self.cursor = target;
        true
    }

    pub fn toggle(&mut self, index: usize) -> ToggleOutcome {
        let Some(item) = self.items.get(index) else {
            return ToggleOutcome::Rejected;
        };
        if !item.enabled {
            return ToggleOutcome::Rejected;
        }
        if self.selected.remove(&index) {
            return ToggleOutcome::Removed;
        }
        if self.max_selections != 0 && self.selected.len() >= self.max_selections {
            return ToggleOutcome::Rejected;
        }
        self.selected.insert(index);
        ToggleOutcome::Added {
            reached_cap: self.max_selections != 0 && self.selected.len() == self.max_selections,
        }
    }
}
