//! In-memory document store: URI to latest full text, nothing else.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    pub fn get(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(String::as_str)
    }

    /// Whole-document replacement, used by both `didOpen` and `didChange` — there is no
    /// incremental sync here, only Full.
    pub fn open(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(uri.into(), text.into());
    }

    pub fn update(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(uri.into(), text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_get_round_trips_the_text() {
        let mut store = DocumentStore::new();
        store.open("file:///a.pebble", "let x = 1;");
        assert_eq!(store.get("file:///a.pebble"), Some("let x = 1;"));
    }

    #[test]
    fn update_replaces_rather_than_merges() {
        let mut store = DocumentStore::new();
        store.open("file:///a.pebble", "let x = 1;");
        store.update("file:///a.pebble", "let y = 2;");
        assert_eq!(store.get("file:///a.pebble"), Some("let y = 2;"));
    }

    #[test]
    fn unknown_uri_resolves_to_nothing() {
        let store = DocumentStore::new();
        assert_eq!(store.get("file:///missing.pebble"), None);
    }
}
