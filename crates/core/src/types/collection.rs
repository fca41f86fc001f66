//! Collection kinds managed by the console.
//!
//! Every route, form and list view dispatches on [`CollectionKind`] instead of
//! comparing collection names, so adding a collection means adding a variant.

use serde::{Deserialize, Serialize};

/// One of the five record collections the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Users,
    Categories,
    Products,
    Orders,
    OrderItems,
}

impl CollectionKind {
    /// All collections, in dependency order (referenced kinds first).
    pub const ALL: [Self; 5] = [
        Self::Users,
        Self::Categories,
        Self::Products,
        Self::Orders,
        Self::OrderItems,
    ];

    /// Collection name as used in URLs and by the store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
        }
    }

    /// Human readable collection title.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Categories => "Categories",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::OrderItems => "Order Items",
        }
    }

    /// Singular name of one record, for headings like "Edit Product".
    #[must_use]
    pub const fn singular(&self) -> &'static str {
        match self {
            Self::Users => "User",
            Self::Categories => "Category",
            Self::Products => "Product",
            Self::Orders => "Order",
            Self::OrderItems => "Order Item",
        }
    }

    /// Ordered field names for forms and list columns. Always starts with `key`.
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Users => &["key", "name", "email"],
            Self::Categories => &["key", "name"],
            Self::Products => &["key", "name", "price", "category_id"],
            Self::Orders => &["key", "user_id", "order_date"],
            Self::OrderItems => &["key", "order_id", "product_id", "quantity"],
        }
    }

    /// Path of the paginated list view.
    #[must_use]
    pub fn list_path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a path segment names no known collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl std::str::FromStr for CollectionKind {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}
