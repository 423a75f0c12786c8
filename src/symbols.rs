use core::fmt::{Debug, Formatter};
use std::collections::HashMap;

/// Ordered, deduplicated table of names. A name's index is its insertion
/// position and never changes.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    val_to_idx: HashMap<String, usize>,
    idx_to_val: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `val`, and whether it was newly inserted.
    pub fn insert(&mut self, val: &str) -> (usize, bool) {
        if let Some(&idx) = self.val_to_idx.get(val) {
            (idx, false)
        } else {
            let idx = self.idx_to_val.len();
            self.val_to_idx.insert(val.to_string(), idx);
            self.idx_to_val.push(val.to_string());
            (idx, true)
        }
    }
    pub fn index(&self, val: &str) -> Option<usize> {
        self.val_to_idx.get(val).copied()
    }
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.idx_to_val.get(idx).map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.idx_to_val.len()
    }
    pub fn is_empty(&self) -> bool {
        self.idx_to_val.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.idx_to_val.iter().map(String::as_str)
    }
    pub fn as_slice(&self) -> &[String] {
        &self.idx_to_val
    }
}

impl<S: AsRef<str>> FromIterator<S> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::default();
        for name in iter {
            table.insert(name.as_ref());
        }
        table
    }
}

impl Debug for SymbolTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.idx_to_val.iter().enumerate()).finish()
    }
}
