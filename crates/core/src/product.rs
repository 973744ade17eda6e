use serde::{Deserialize, Serialize};

/// A catalog product as displayed and edited at the till.
///
/// All four fields are text: `barcode` may come from a numeric source column and
/// `price` is only parsed when it is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub article: String,
    pub barcode: String,
    pub description: String,
    pub price: String,
}

impl Product {
    pub fn new(
        article: impl Into<String>,
        barcode: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            article: article.into(),
            barcode: barcode.into(),
            description: description.into(),
            price: price.into(),
        }
    }

    pub fn field(&self, field: ProductField) -> &str {
        match field {
            ProductField::Article => &self.article,
            ProductField::Barcode => &self.barcode,
            ProductField::Description => &self.description,
            ProductField::Price => &self.price,
        }
    }

    pub fn set_field(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Article => self.article = value,
            ProductField::Barcode => self.barcode = value,
            ProductField::Description => self.description = value,
            ProductField::Price => self.price = value,
        }
    }

    /// Overwrite the fields present in `patch`.
    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(v) = &patch.article {
            self.article = v.clone();
        }
        if let Some(v) = &patch.barcode {
            self.barcode = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = &patch.price {
            self.price = v.clone();
        }
    }

    /// Barcode comparison key: surrounding whitespace is not significant.
    pub fn barcode_key(&self) -> &str {
        self.barcode.trim()
    }
}

/// One editable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductField {
    Article,
    Barcode,
    Description,
    Price,
}

impl ProductField {
    pub const ALL: [ProductField; 4] = [
        ProductField::Article,
        ProductField::Barcode,
        ProductField::Description,
        ProductField::Price,
    ];
}

/// Partial product record sent to the persistence sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.article.is_none()
            && self.barcode.is_none()
            && self.description.is_none()
            && self.price.is_none()
    }
}

impl From<&Product> for ProductPatch {
    fn from(p: &Product) -> Self {
        Self {
            article: Some(p.article.clone()),
            barcode: Some(p.barcode.clone()),
            description: Some(p.description.clone()),
            price: Some(p.price.clone()),
        }
    }
}

/// The two query-driven result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Barcode,
    Article,
}

impl core::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ViewKind::Barcode => f.write_str("barcode"),
            ViewKind::Article => f.write_str("article"),
        }
    }
}
