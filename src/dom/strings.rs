//! String Interning Pool
//!
//! Element names, text and comments are stored once and referenced by
//! `u32` id from the node arena. Lookup goes through a content hash so
//! repeated names (the common case in element-heavy trees) share storage.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
///
/// Memory layout:
/// - `data`: one buffer holding every distinct string back to back
/// - `spans`: (offset, len) into `data` for each string id
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug)]
pub struct StringPool {
    data: String,
    spans: Vec<(u32, u32)>,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            data: String::with_capacity(1024),
            spans: Vec::with_capacity(64),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for "no string"
        pool.spans.push((0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its id. The empty string is always id 0.
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        if let Some(id) = self.lookup(s) {
            return id;
        }

        let offset = self.data.len() as u32;
        self.data.push_str(s);
        let id = self.spans.len() as u32;
        self.spans.push((offset, s.len() as u32));
        self.hash_index
            .entry(Self::compute_hash(s))
            .or_default()
            .push(id);
        id
    }

    /// Id of an already interned string
    pub fn lookup(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        self.hash_index
            .get(&Self::compute_hash(s))?
            .iter()
            .copied()
            .find(|&id| self.get_str(id) == Some(s))
    }

    /// Get a string by id
    pub fn get_str(&self, id: u32) -> Option<&str> {
        let &(offset, len) = self.spans.get(id as usize)?;
        let start = offset as usize;
        self.data.get(start..start + len as usize)
    }

    /// Number of distinct strings, including the reserved empty entry
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.len() <= 1 // Entry 0 is reserved
    }

    /// Bytes of string data stored
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}
