//! `barlo-core`: product lookup building blocks.
//!
//! This crate contains **pure** primitives (no IO): the product record, the
//! error taxonomy, and the text/price normalization used for search and display.

pub mod error;
pub mod price;
pub mod product;
pub mod text;

pub use error::{LookupError, LookupResult};
pub use price::{PriceFormat, format_price, parse_price};
pub use product::{Product, ProductField, ProductPatch, ViewKind};
pub use text::{fold_for_search, normalize};
