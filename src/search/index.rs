//! Searchable projection of a single entity

use tracing::trace;

use super::entity::Entity;
use super::query::Query;
use super::serialize::to_search_text;

/// Caches a lowercase textual projection of an entity graph and evaluates
/// queries against it.
///
/// The index holds a handle to the caller's graph and never mutates it. The
/// cache is only refreshed by [`SearchIndex::update`], either explicitly or
/// through the `auto_update` flag of the query methods.
#[derive(Debug)]
pub struct SearchIndex {
    entity: Entity,
    serialized: Option<String>,
}

impl SearchIndex {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            serialized: None,
        }
    }

    /// Rebuild the cached projection from the current state of the entity
    pub fn update(&mut self) {
        let text = to_search_text(&self.entity);
        trace!("Rebuilt search text ({} bytes)", text.len());
        self.serialized = Some(text);
    }

    /// Check a raw query against the entity.
    ///
    /// `None` and `""` match without touching the cache. With `auto_update`
    /// the projection is rebuilt first; otherwise the cached projection is
    /// used, built once if it never was.
    pub fn contains(&mut self, query: Option<&str>, auto_update: bool) -> bool {
        match query {
            Some(q) if !q.is_empty() => self.matches(&Query::parse(q), auto_update),
            _ => true,
        }
    }

    /// Same as [`SearchIndex::contains`] for a query parsed once up front,
    /// e.g. when filtering many rows with the same input.
    ///
    /// The cache follows `auto_update` even when every term is empty.
    pub fn matches(&mut self, query: &Query, auto_update: bool) -> bool {
        let text = self.text(auto_update);
        query.is_empty() || query.matches(text)
    }

    fn text(&mut self, auto_update: bool) -> &str {
        if auto_update || self.serialized.is_none() {
            self.update();
        }
        self.serialized.as_deref().unwrap_or_default()
    }

    /// The cached projection, if built
    pub fn serialized(&self) -> Option<&str> {
        self.serialized.as_deref()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fruit_basket() -> SearchIndex {
        SearchIndex::new(Entity::from(json!({
            "items": ["Apple", "Banana"],
            "owner": "Red Car Logistics"
        })))
    }

    #[test]
    fn test_empty_query_matches_without_serializing() {
        let mut index = fruit_basket();
        assert!(index.contains(None, true));
        assert!(index.contains(Some(""), true));
        assert!(index.serialized().is_none());
    }

    #[test]
    fn test_cycle_safety() {
        let node = Entity::object();
        node.insert("name", "loop");
        node.insert("self", node.clone());

        let mut index = SearchIndex::new(node);
        index.update();
        assert!(index.serialized().is_some());
        assert!(!index.contains(Some("anything-not-present"), true));
        assert!(index.contains(Some("loop"), true));
    }

    #[test]
    fn test_case_insensitive() {
        let mut index = SearchIndex::new(Entity::from(json!({"label": "foo bar"})));
        assert!(index.contains(Some("FOO"), true));
        assert_eq!(index.contains(Some("FOO"), true), index.contains(Some("foo"), true));
    }

    #[test]
    fn test_negation() {
        let mut index = fruit_basket();
        assert!(!index.contains(Some("-apple"), true));
        assert!(index.contains(Some("-nonexistent"), true));
        assert!(!index.contains(Some("banana,-apple"), true));
    }

    #[test]
    fn test_conjunctive_terms() {
        let mut index = fruit_basket();
        assert!(index.contains(Some("red,car"), true));
        assert!(!index.contains(Some("red,truck"), true));
    }

    #[test]
    fn test_stale_cache_opt_out() {
        let entity = Entity::object();
        entity.insert("name", "x");

        let mut index = SearchIndex::new(entity.clone());
        index.update();
        entity.insert("name", "y");

        assert!(index.contains(Some("x"), false));
        assert!(!index.contains(Some("x"), true));
        assert!(index.contains(Some("y"), true));
    }

    #[test]
    fn test_blank_terms_still_refresh_cache() {
        let entity = Entity::object();
        entity.insert("name", "x");

        let mut index = SearchIndex::new(entity.clone());
        index.update();
        entity.insert("name", "y");

        assert!(index.contains(Some(","), true));
        assert!(!index.contains(Some("x"), false));
        assert!(index.contains(Some(" - "), false));
        assert!(index.contains(Some("y"), false));
    }

    #[test]
    fn test_cycle_placeholder_is_not_searchable() {
        let depot = Entity::object();
        depot.insert("name", "depot");
        depot.insert("self", depot.clone());

        let mut index = SearchIndex::new(depot);
        assert!(index.contains(Some("-null"), true));
        assert!(!index.contains(Some("null"), true));
        assert!(!index.contains(Some("ul"), true));
        assert!(index.contains(Some("depot"), true));
    }

    #[test]
    fn test_first_use_builds_cache() {
        let mut index = fruit_basket();
        assert!(index.contains(Some("banana"), false));
        assert!(index.serialized().is_some());
    }

    #[test]
    fn test_regex_special_term() {
        let mut dotted = SearchIndex::new(Entity::from(json!({"code": "a.b"})));
        let mut other = SearchIndex::new(Entity::from(json!({"code": "axb"})));
        assert!(dotted.contains(Some("a.b"), true));
        assert!(!other.contains(Some("a.b"), true));
    }

    #[test]
    fn test_parsed_query_reuse() {
        let query = Query::parse("apple");
        let mut rows = vec![
            fruit_basket(),
            SearchIndex::new(Entity::from(json!({"items": ["pear"]}))),
        ];
        let hits = rows.iter_mut().filter_map(|row| row.matches(&query, true).then_some(())).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_entity_is_not_mutated() {
        let entity = Entity::from(json!({"name": "Mixed Case"}));
        let mut index = SearchIndex::new(entity.clone());
        index.contains(Some("mixed"), true);
        assert!(matches!(entity.get("name"), Some(Entity::String(s)) if s == "Mixed Case"));
        assert!(index.entity().is_same(&entity));
    }
}
