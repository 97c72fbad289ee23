use std::collections::HashMap;

pub const DEFAULT_PRIMARY_KEY: &str = "id";

const KNOWN_KEYS: &[(&str, &str)] = &[
    ("products", "product_id"),
    ("orders", "order_id"),
    ("order_items", "order_item_id"),
    ("order_item_refunds", "order_item_refund_id"),
    ("website_pageviews", "website_pageview_id"),
    ("website_session", "website_session_id"),
];

/// Static table name -> primary key column mapping.
///
/// Keys are configuration, never read from the schema. Any table without an
/// entry resolves to [`DEFAULT_PRIMARY_KEY`].
#[derive(Debug, Clone)]
pub struct PrimaryKeyRegistry {
    keys: HashMap<String, String>,
    fallback: String,
}

impl Default for PrimaryKeyRegistry {
    fn default() -> Self {
        let keys = KNOWN_KEYS
            .iter()
            .map(|(table, key)| (table.to_string(), key.to_string()))
            .collect();
        Self {
            keys,
            fallback: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }
}

impl PrimaryKeyRegistry {
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            fallback: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    pub fn with(mut self, table: &str, key: &str) -> Self {
        self.keys.insert(table.to_string(), key.to_string());
        self
    }

    pub fn resolve(&self, table: &str) -> &str {
        self.keys.get(table).unwrap_or(&self.fallback)
    }
}
