//! Authoritative in-memory catalog.

use chrono::{DateTime, Utc};

use barlo_core::{Product, ProductPatch};

/// The full product list of the current session.
///
/// Populated by replacing its contents wholesale; the only per-product mutation is
/// [`CatalogStore::apply_patch`], driven by the edit reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStore {
    products: Vec<Product>,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-mapped products (tests, fixtures).
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut store = Self::new();
        store.replace(products);
        store
    }

    /// Replace the whole catalog. Previous contents are dropped, not merged.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loaded_at = Some(Utc::now());
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// `None` until the first successful load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Products whose trimmed barcode equals the trimmed `barcode`.
    pub fn find_by_barcode<'a>(&'a self, barcode: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        let key = barcode.trim();
        self.products.iter().filter(move |p| p.barcode_key() == key)
    }

    /// Apply `patch` to every product sharing `barcode`; returns how many changed.
    pub fn apply_patch(&mut self, barcode: &str, patch: &ProductPatch) -> usize {
        apply_patch_by_barcode(&mut self.products, barcode, patch)
    }
}

/// Patch every entry of `products` whose trimmed barcode equals `barcode`.
pub(crate) fn apply_patch_by_barcode(
    products: &mut [Product],
    barcode: &str,
    patch: &ProductPatch,
) -> usize {
    let key = barcode.trim();
    let mut updated = 0;
    for product in products.iter_mut().filter(|p| p.barcode_key() == key) {
        product.apply(patch);
        updated += 1;
    }
    updated
}
