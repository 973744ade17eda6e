//! Query-driven match views over the catalog.
//!
//! Both views are recomputed from scratch by a full scan on every query change.
//! They are copies of store entries in store order; the only in-place mutation is
//! [`MatchEngine::apply_patch`], used by the edit reconciler.

use barlo_core::{Product, ProductPatch, ViewKind, fold_for_search};

use crate::store::{CatalogStore, apply_patch_by_barcode};

/// Products whose trimmed barcode equals the trimmed `query`. Empty query ⇒ none.
pub fn match_barcode(products: &[Product], query: &str) -> Vec<Product> {
    let key = query.trim();
    if key.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| p.barcode_key() == key)
        .cloned()
        .collect()
}

/// Products whose folded article contains the folded `query`. Empty query ⇒ none.
pub fn match_article(products: &[Product], query: &str) -> Vec<Product> {
    let needle = fold_for_search(query);
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| fold_for_search(&p.article).contains(&needle))
        .cloned()
        .collect()
}

/// Holds the current queries and their match views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchEngine {
    barcode_query: String,
    article_query: String,
    barcode_matches: Vec<Product>,
    article_matches: Vec<Product>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the barcode query (stored trimmed) and recompute the barcode view.
    pub fn set_barcode_query(&mut self, query: &str, store: &CatalogStore) -> &[Product] {
        self.barcode_query = query.trim().to_string();
        self.barcode_matches = match_barcode(store.products(), &self.barcode_query);
        &self.barcode_matches
    }

    /// Set the article query (stored as typed) and recompute the article view.
    pub fn set_article_query(&mut self, query: &str, store: &CatalogStore) -> &[Product] {
        self.article_query = query.to_string();
        self.article_matches = match_article(store.products(), &self.article_query);
        &self.article_matches
    }

    /// Re-derive both views from the current queries (after a catalog load).
    pub fn refresh(&mut self, store: &CatalogStore) {
        self.barcode_matches = match_barcode(store.products(), &self.barcode_query);
        self.article_matches = match_article(store.products(), &self.article_query);
    }

    pub fn barcode_query(&self) -> &str {
        &self.barcode_query
    }

    pub fn article_query(&self) -> &str {
        &self.article_query
    }

    pub fn barcode_matches(&self) -> &[Product] {
        &self.barcode_matches
    }

    pub fn article_matches(&self) -> &[Product] {
        &self.article_matches
    }

    pub fn view(&self, kind: ViewKind) -> &[Product] {
        match kind {
            ViewKind::Barcode => &self.barcode_matches,
            ViewKind::Article => &self.article_matches,
        }
    }

    /// Whether a search is active for `kind` (non-blank query).
    pub fn is_searching(&self, kind: ViewKind) -> bool {
        let query = match kind {
            ViewKind::Barcode => &self.barcode_query,
            ViewKind::Article => &self.article_query,
        };
        !query.trim().is_empty()
    }

    /// A search is active for `kind` and found nothing ("no product found").
    pub fn no_results(&self, kind: ViewKind) -> bool {
        self.is_searching(kind) && self.view(kind).is_empty()
    }

    /// Patch every entry with `barcode` in both views; returns how many changed.
    pub(crate) fn apply_patch(&mut self, barcode: &str, patch: &ProductPatch) -> usize {
        apply_patch_by_barcode(&mut self.barcode_matches, barcode, patch)
            + apply_patch_by_barcode(&mut self.article_matches, barcode, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store() -> CatalogStore {
        CatalogStore::from_products(vec![
            Product::new("Coca-Cola", "5449000131836", "0.5l", "1.50"),
            Product::new("Café Crème", "7610000000011", "Kapseln", "4.90"),
            Product::new("Fanta Orange", "5449000011527", "", "1.40"),
            Product::new("Coca-Cola Zero", "5449000133335", "", "1.50"),
        ])
    }

    #[test]
    fn barcode_query_matches_exactly() {
        let store = store();
        let mut engine = MatchEngine::new();

        let hits = engine.set_barcode_query("5449000131836", &store);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article, "Coca-Cola");

        assert!(engine.set_barcode_query("5449000131837", &store).is_empty());
        assert!(engine.no_results(ViewKind::Barcode));
    }

    #[test]
    fn barcode_query_is_trimmed_but_not_a_prefix_match() {
        let store = store();
        let mut engine = MatchEngine::new();

        assert_eq!(engine.set_barcode_query("  5449000131836\n", &store).len(), 1);
        assert_eq!(engine.barcode_query(), "5449000131836");
        assert!(engine.set_barcode_query("5449", &store).is_empty());
    }

    #[test]
    fn empty_queries_suppress_search() {
        let store = store();
        let mut engine = MatchEngine::new();

        assert!(engine.set_barcode_query("   ", &store).is_empty());
        assert!(engine.set_article_query("", &store).is_empty());
        assert!(!engine.no_results(ViewKind::Barcode));
        assert!(!engine.no_results(ViewKind::Article));
    }

    #[test]
    fn article_query_is_case_and_accent_insensitive() {
        let store = store();
        let mut engine = MatchEngine::new();

        let hits = engine.set_article_query("cafe", &store);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article, "Café Crème");

        assert_eq!(engine.set_article_query(" CRÈME ", &store).len(), 1);
        assert_eq!(engine.article_query(), " CRÈME ");
    }

    #[test]
    fn article_matches_preserve_store_order() {
        let store = store();
        let mut engine = MatchEngine::new();

        let names: Vec<_> = engine
            .set_article_query("cola", &store)
            .iter()
            .map(|p| p.article.clone())
            .collect();
        assert_eq!(names, vec!["Coca-Cola", "Coca-Cola Zero"]);
    }

    #[test]
    fn queries_do_not_touch_the_store() {
        let store = store();
        let before = store.clone();
        let mut engine = MatchEngine::new();
        engine.set_barcode_query("5449000131836", &store);
        engine.set_article_query("a", &store);
        assert_eq!(store, before);
    }

    #[test]
    fn refresh_rederives_views_after_reload() {
        let mut catalog = CatalogStore::new();
        let mut engine = MatchEngine::new();
        engine.set_barcode_query("5449000131836", &catalog);
        engine.set_article_query("fanta", &catalog);
        assert!(engine.barcode_matches().is_empty());

        catalog.replace(store().products().to_vec());
        engine.refresh(&catalog);
        assert_eq!(engine.barcode_matches().len(), 1);
        assert_eq!(engine.article_matches().len(), 1);
    }

    #[test]
    fn apply_patch_reaches_both_views() {
        let store = store();
        let mut engine = MatchEngine::new();
        engine.set_barcode_query("5449000131836", &store);
        engine.set_article_query("coca", &store);

        let patch = ProductPatch {
            description: Some("1l".to_string()),
            ..ProductPatch::default()
        };
        assert_eq!(engine.apply_patch("5449000131836", &patch), 2);
        assert_eq!(engine.barcode_matches()[0].description, "1l");
        assert_eq!(engine.article_matches()[0].description, "1l");
        assert_eq!(engine.article_matches()[1].description, "");
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        (
            "[A-Za-zéèàüö -]{0,12}",
            "[0-9 ]{0,6}",
            "[a-z]{0,5}",
            "[0-9]{1,3}\\.[0-9]{2}",
        )
            .prop_map(|(a, b, d, p)| Product::new(a, b, d, p))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the barcode view is exactly the trimmed-equal subset, in order.
        #[test]
        fn barcode_view_is_exact_subset(
            products in prop::collection::vec(arb_product(), 0..20),
            query in "[0-9 ]{0,6}"
        ) {
            let store = CatalogStore::from_products(products.clone());
            let mut engine = MatchEngine::new();
            let hits = engine.set_barcode_query(&query, &store).to_vec();

            let expected: Vec<Product> = if query.trim().is_empty() {
                vec![]
            } else {
                products.into_iter().filter(|p| p.barcode.trim() == query.trim()).collect()
            };
            prop_assert_eq!(hits, expected);
        }

        /// Property: every article hit contains the folded query; every miss does not.
        #[test]
        fn article_view_partitions_catalog(
            products in prop::collection::vec(arb_product(), 0..20),
            query in "[A-Za-zéü ]{1,4}"
        ) {
            let store = CatalogStore::from_products(products.clone());
            let mut engine = MatchEngine::new();
            let hits = engine.set_article_query(&query, &store).to_vec();
            let needle = fold_for_search(&query);

            if needle.is_empty() {
                prop_assert!(hits.is_empty());
            } else {
                let expected: Vec<Product> = products
                    .into_iter()
                    .filter(|p| fold_for_search(&p.article).contains(&needle))
                    .collect();
                prop_assert_eq!(hits, expected);
            }
        }

        /// Property: issuing the same query twice yields the same views.
        #[test]
        fn queries_are_idempotent(
            products in prop::collection::vec(arb_product(), 0..20),
            barcode in "[0-9]{0,3}",
            article in "[a-z]{0,3}"
        ) {
            let store = CatalogStore::from_products(products);
            let mut engine = MatchEngine::new();

            let first_b = engine.set_barcode_query(&barcode, &store).to_vec();
            let first_a = engine.set_article_query(&article, &store).to_vec();
            let second_b = engine.set_barcode_query(&barcode, &store).to_vec();
            let second_a = engine.set_article_query(&article, &store).to_vec();

            prop_assert_eq!(first_b, second_b);
            prop_assert_eq!(first_a, second_a);
        }
    }
}
