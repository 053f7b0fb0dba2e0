//! Saved and in-progress copies of a value being edited.

/// A saved value plus, while an edit is in progress, the edited copy.
///
/// Nothing changes `saved` except [`commit`](Self::commit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    saved: T,
    current: Option<T>,
}
impl<T: Clone + PartialEq> Snapshot<T> {
    pub fn new(saved: T) -> Self {
        Self { saved, current: None }
    }

    pub fn saved(&self) -> &T {
        &self.saved
    }

    /// The edited copy if there is one, else the saved value.
    pub fn current(&self) -> &T {
        self.current.as_ref().unwrap_or(&self.saved)
    }

    /// Starts (or continues) an edit and returns the copy being edited.
    pub fn edit(&mut self) -> &mut T {
        self.current.get_or_insert_with(|| self.saved.clone())
    }

    /// Replaces the saved value with the edited copy. Returns `false` when
    /// there was nothing to commit.
    pub fn commit(&mut self) -> bool {
        match self.current.take() {
            Some(current) => {
                self.saved = current;
                true
            },
            None => false,
        }
    }

    /// Throws the edited copy away.
    pub fn discard(&mut self) {
        self.current = None;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.current.as_ref().is_some_and(|current| *current != self.saved)
    }
}
