use std::collections::HashSet;

use crc32fast::Hasher;
use serde_json::Value;

/// Seed derived from the content of a patch, so the same patch always
/// back-fills the same ids
pub fn content_seed(value: &Value) -> String {
    let mut hasher = Hasher::new();
    hasher.update(value.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator that never hands out an id already in use
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
            taken: HashSet::new(),
        }
    }

    pub fn for_content(value: &Value) -> Self {
        Self::from_seed(content_seed(value))
    }

    /// Mark an existing id as used
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.taken.insert(id.into());
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Generate the next free id, e.g. `nav-1a2b3c-4`
    pub fn new_id(&mut self, prefix: &str) -> String {
        loop {
            self.count += 1;
            let id = format!("{}-{}-{}", prefix, self.seed, self.count);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_seed_is_stable() {
        let a = content_seed(&json!({ "navGroups": [] }));
        let b = content_seed(&json!({ "navGroups": [] }));
        let c = content_seed(&json!({ "navGroups": [{ "label": "x", "items": [] }] }));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequential_ids_skip_reserved() {
        let mut gen = IdGenerator::from_seed("abc");
        gen.reserve("gen-abc-1");

        assert_eq!(gen.new_id("gen"), "gen-abc-2");
        assert_eq!(gen.new_id("gen"), "gen-abc-3");
        assert!(gen.is_taken("gen-abc-3"));
    }
}
