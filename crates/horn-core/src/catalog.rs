//! # Catalog
//!
//! The static list of purchasable items.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup ──► Catalog::builtin() ──► shared (Arc) by every session      │
//! │                                                                         │
//! │  • Loaded once, immutable for the lifetime of a session                │
//! │  • No dynamic loading, no external catalog service                     │
//! │  • Lookups are by SKU (business identifier)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::validation::{validate_product_name, validate_sku};

// =============================================================================
// Category
// =============================================================================

/// Product category (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    Snack,
    Confectionery,
    Seasoning,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 3] = [
        Category::Snack,
        Category::Confectionery,
        Category::Seasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Snack => "Snack",
            Category::Confectionery => "Confectionery",
            Category::Seasoning => "Seasoning",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A product that can be requested on the order page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    /// Stock Keeping Unit - unique, stable identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    pub category: Category,

    pub brand: Option<String>,

    /// Country of origin.
    pub origin: Option<String>,

    /// Unit size, e.g. "92 g".
    pub size: Option<String>,

    /// Units per carton, e.g. "24 x 92 g".
    pub case_pack: Option<String>,

    /// Minimum order quantity descriptor, e.g. "10 cartons".
    ///
    /// Free text; the first embedded integer is the enforced minimum.
    pub moq: Option<String>,

    pub notes: Option<String>,

    /// Image path under the site's public directory.
    pub image: String,
}

impl CatalogItem {
    /// Minimum cartons enforced for this item, if its descriptor has one.
    pub fn minimum_quantity(&self) -> Option<i64> {
        self.moq.as_deref().and_then(crate::moq::parse_moq)
    }

    /// Text searched by [`Catalog::search`], lowercased.
    fn haystack(&self) -> String {
        [
            Some(self.sku.as_str()),
            Some(self.name.as_str()),
            Some(self.category.as_str()),
            self.brand.as_deref(),
            self.origin.as_deref(),
            self.size.as_deref(),
            self.case_pack.as_deref(),
            self.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable, ordered collection of catalog items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting malformed or duplicate SKUs.
    pub fn new(items: Vec<CatalogItem>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            validate_sku(&item.sku)?;
            validate_product_name(&item.name)?;
            if !seen.insert(item.sku.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "sku".to_string(),
                    value: item.sku.clone(),
                }
                .into());
            }
        }
        Ok(Catalog { items })
    }

    /// The sample catalog shipped with the site.
    pub fn builtin() -> Self {
        Catalog {
            items: builtin_items(),
        }
    }

    /// Looks up an item by SKU.
    pub fn get(&self, sku: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.sku == sku)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.get(sku).is_some()
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Case-insensitive substring search across the item's text fields.
    ///
    /// An empty (or whitespace) query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.haystack().contains(&query))
            .collect()
    }

    /// Items in a single category, in catalog order.
    pub fn by_category(&self, category: Category) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }
}

fn builtin_items() -> Vec<CatalogItem> {
    #[allow(clippy::too_many_arguments)]
    fn item(
        sku: &str,
        name: &str,
        category: Category,
        brand: &str,
        size: &str,
        case_pack: &str,
        moq: &str,
        notes: &str,
    ) -> CatalogItem {
        CatalogItem {
            sku: sku.to_string(),
            name: name.to_string(),
            category,
            brand: Some(brand.to_string()),
            origin: Some("Mexico".to_string()),
            size: Some(size.to_string()),
            case_pack: Some(case_pack.to_string()),
            moq: Some(moq.to_string()),
            notes: Some(notes.to_string()),
            image: format!("/products/{}.svg", sku.to_lowercase()),
        }
    }

    vec![
        item(
            "RHG-SN-101",
            "Chili-Lime Rolled Tortilla Chips (Sample)",
            Category::Snack,
            "Mexico Snack",
            "92 g",
            "24 x 92 g",
            "10 cartons",
            "Sample listing. Availability and packaging may vary by supplier.",
        ),
        item(
            "RHG-SN-102",
            "Spicy Corn Puffs (Sample)",
            Category::Snack,
            "Mexico Snack",
            "55 g",
            "30 x 55 g",
            "10 cartons",
            "Great for convenience stores and kiosks.",
        ),
        item(
            "RHG-CN-201",
            "Assorted Fruit Chews (Sample)",
            Category::Confectionery,
            "Confectionery",
            "35 g",
            "48 x 35 g",
            "10 cartons",
            "Shelf-stable. Popular for mixed displays.",
        ),
        item(
            "RHG-SE-301",
            "Chili-Lime Seasoning (Sample)",
            Category::Seasoning,
            "Seasoning",
            "142 g",
            "12 x 142 g",
            "5 cartons",
            "For snacks, fries, and street food applications.",
        ),
    ]
}
