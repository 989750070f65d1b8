//! In-memory document store.

use std::collections::{BTreeMap, HashMap};

use crate::document::Document;
use crate::error::DocsmithError;

/// Documents keyed by relative source path, with a slug index.
///
/// Iteration follows path order, so anything derived from the store is
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct ContentStore {
    docs: BTreeMap<String, Document>,
    slugs: HashMap<String, String>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the document stored under `key`.
    ///
    /// Fails with [`DocsmithError::DuplicateSlug`] if another key already
    /// holds the document's slug; the store is left unchanged.
    pub fn insert(&mut self, key: String, doc: Document) -> Result<Option<Document>, DocsmithError> {
        if let Some(existing) = self.slugs.get(&doc.slug)
            && *existing != key
        {
            return Err(DocsmithError::DuplicateSlug {
                slug: doc.slug,
                path: key,
                existing: existing.clone(),
            });
        }

        let previous = self.docs.remove(&key);
        if let Some(old) = &previous {
            self.slugs.remove(&old.slug);
        }
        self.slugs.insert(doc.slug.clone(), key.clone());
        self.docs.insert(key, doc);
        Ok(previous)
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.docs.get(key)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Document> {
        self.slugs.get(slug).and_then(|key| self.docs.get(key))
    }

    pub(crate) fn get_by_slug_mut(&mut self, slug: &str) -> Option<&mut Document> {
        let key = self.slugs.get(slug)?;
        self.docs.get_mut(key)
    }

    /// Documents in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.docs.values_mut()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = ContentStore::new();
        store.insert("b/c.md".to_owned(), fixtures::document("b/c.md")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b/c.md").unwrap().slug, "b/c");
        assert_eq!(store.get_by_slug("b/c").unwrap().path, "b/c.md");
        assert!(store.get_by_slug("b").is_none());
    }

    #[test]
    fn test_replace_same_key() {
        let mut store = ContentStore::new();
        store.insert("a.md".to_owned(), fixtures::document("a.md")).unwrap();
        let previous = store
            .insert("a.md".to_owned(), fixtures::titled("a.md", "New"))
            .unwrap();

        assert_eq!(previous.unwrap().title, "a");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_slug("a").unwrap().title, "New");
    }

    #[test]
    fn test_replace_with_new_slug_drops_old_index() {
        let mut store = ContentStore::new();
        store.insert("a.md".to_owned(), fixtures::document("a.md")).unwrap();
        let mut renamed = fixtures::document("a.md");
        renamed.slug = "renamed".to_owned();
        store.insert("a.md".to_owned(), renamed).unwrap();

        assert!(store.get_by_slug("a").is_none());
        assert!(store.get_by_slug("renamed").is_some());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut store = ContentStore::new();
        store.insert("a.md".to_owned(), fixtures::titled("a.md", "First")).unwrap();
        let err = store
            .insert("a.mdx".to_owned(), fixtures::document("a.mdx"))
            .unwrap_err();

        assert!(matches!(
            err,
            DocsmithError::DuplicateSlug { ref existing, .. } if existing == "a.md"
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_slug("a").unwrap().title, "First");
    }

    #[test]
    fn test_iter_in_path_order() {
        let mut store = ContentStore::new();
        for path in ["z.md", "a/b.md", "a.md"] {
            store.insert(path.to_owned(), fixtures::document(path)).unwrap();
        }
        let paths: Vec<&str> = store.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "a/b.md", "z.md"]);
    }
}
