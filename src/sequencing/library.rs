#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::arrangement::SongArrangement;
use crate::sequencing::pattern::Pattern;

/// A saved pattern. Saving copies the working pattern, so later edits to
/// the working grid never reach the library.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryPattern {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub pattern: Pattern,
}

impl LibraryPattern {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

/// Named patterns plus the current selection.
///
/// Saving while a pattern is selected overwrites it; with nothing selected
/// it appends and selects the new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternLibrary {
    patterns: Vec<LibraryPattern>,
    selected: Option<usize>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns(patterns: Vec<LibraryPattern>) -> Self {
        let mut library = Self::new();
        library.import(patterns);
        library
    }

    /// Store a copy of `working`, returning its index. Without a name the
    /// pattern is called "Pattern N".
    pub fn save(&mut self, name: Option<&str>, working: &Pattern) -> usize {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!("Pattern {}", self.patterns.len() + 1),
        };
        let entry = LibraryPattern::new(name, working.clone());

        match self.selected.filter(|&index| index < self.patterns.len()) {
            Some(index) => {
                self.patterns[index] = entry;
                index
            }
            None => {
                self.patterns.push(entry);
                let index = self.patterns.len() - 1;
                self.selected = Some(index);
                index
            }
        }
    }

    /// Append `entry` as a new pattern regardless of the selection, and
    /// select it.
    pub fn push(&mut self, entry: LibraryPattern) -> usize {
        self.patterns.push(entry);
        let index = self.patterns.len() - 1;
        self.selected = Some(index);
        index
    }

    /// Remove a pattern and repair the arrangement's references to it.
    pub fn delete(&mut self, index: usize, arrangement: &mut SongArrangement) -> bool {
        if index >= self.patterns.len() {
            return false;
        }
        let removed = self.patterns.remove(index);
        arrangement.remap_after_delete(index);
        self.selected = (!self.patterns.is_empty()).then_some(0);
        log::info!("deleted pattern {index} ({})", removed.name);
        true
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.patterns.get_mut(index) {
            Some(entry) => {
                entry.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&LibraryPattern> {
        self.patterns.get(index)
    }

    /// Copy a saved pattern over the working pattern and select it.
    pub fn load_into(&mut self, index: usize, working: &mut Pattern) -> bool {
        let Some(entry) = self.patterns.get(index) else {
            return false;
        };
        working.clone_from(&entry.pattern);
        self.selected = Some(index);
        true
    }

    pub fn import(&mut self, patterns: Vec<LibraryPattern>) {
        self.selected = (!patterns.is_empty()).then_some(0);
        self.patterns = patterns;
    }

    pub fn patterns(&self) -> &[LibraryPattern] {
        &self.patterns
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.patterns.len());
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
        self.selected = None;
    }
}
