//! Runtime-only mock row producers.
//!
//! A page's table is fed by a producer attached at runtime. Producers are
//! never serialized; whenever a document is loaded or imported every page is
//! re-attached to [`MockData::empty`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type Producer = dyn Fn() -> Vec<Value> + Send + Sync;

#[derive(Clone)]
pub struct MockData {
    producer: Arc<Producer>,
}

impl MockData {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Producer that yields no rows
    pub fn empty() -> Self {
        Self::new(Vec::new)
    }

    pub fn rows(&self) -> Vec<Value> {
        (self.producer)()
    }
}

impl Default for MockData {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for MockData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MockData(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_producer_yields_no_rows() {
        assert!(MockData::default().rows().is_empty());
    }

    #[test]
    fn test_custom_producer() {
        let mock = MockData::new(|| vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        assert_eq!(mock.rows().len(), 2);
    }
}
