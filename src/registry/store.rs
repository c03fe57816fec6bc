//! Concurrency-safe item storage.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, instrument, warn};

use crate::error::RegistryError;
use crate::metrics;

use super::id::{IdGenerator, RandomIdGenerator};
use super::item::{Item, NewItem};

/// Attempts to find an unused identifier before giving up.
pub const MAX_ID_ATTEMPTS: u32 = 8;

/// In-memory item store.
///
/// Cloning is cheap and every clone shares the same items. Entries are
/// never removed.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: Arc<DashMap<String, Item>>,
    ids: Arc<dyn IdGenerator>,
}

impl ItemRegistry {
    /// Create an empty registry with random identifiers.
    pub fn new() -> Self {
        Self::with_id_generator(RandomIdGenerator)
    }

    /// Create an empty registry with a custom identifier source.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            ids: Arc::new(ids),
        }
    }

    /// Validate and store a new item, returning a copy of what was stored.
    #[instrument(skip(self, new_item), fields(quantity = new_item.quantity))]
    pub fn create(&self, new_item: NewItem) -> Result<Item, RegistryError> {
        if let Err(e) = new_item.validate() {
            metrics::inc_item_validation_failures();
            debug!("Rejected item: {}", e);
            return Err(e.into());
        }

        let NewItem { name, quantity } = new_item;
        let created_at = Utc::now().trunc_subsecs(0);

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            // The entry holds its shard lock until dropped at the end of the match arm.
            match self.items.entry(candidate) {
                Entry::Occupied(taken) => {
                    warn!(id = %taken.key(), attempt, "Generated id already in use");
                }
                Entry::Vacant(slot) => {
                    let item = Item {
                        id: slot.key().clone(),
                        name,
                        quantity,
                        created_at,
                    };
                    slot.insert(item.clone());
                    metrics::inc_items_created();
                    debug!(id = %item.id, "Item created");
                    return Ok(item);
                }
            }
        }

        Err(RegistryError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Look up an item by identifier.
    pub fn get(&self, id: &str) -> Result<Item, RegistryError> {
        self.items
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::registry::id::SequentialIdGenerator;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    /// Always hands out the same identifier.
    #[derive(Debug)]
    struct ConstantIds;

    impl IdGenerator for ConstantIds {
        fn next_id(&self) -> String {
            "samesameid00".to_string()
        }
    }

    #[test]
    fn create_returns_input_with_fresh_id() {
        let registry = ItemRegistry::with_id_generator(SequentialIdGenerator::new("t"));
        let before = Utc::now().trunc_subsecs(0);

        let item = registry.create(NewItem::new("widget", 5)).unwrap();

        assert_eq!(item.id, "t00000000001");
        assert_eq!(item.name, "widget");
        assert_eq!(item.quantity, 5);
        assert!(item.created_at >= before);
        assert_eq!(item.created_at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn get_returns_created_item() {
        let registry = ItemRegistry::new();
        let item = registry.create(NewItem::new("widget", 5)).unwrap();

        assert_eq!(registry.get(&item.id).unwrap(), item);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let registry = ItemRegistry::new();
        registry.create(NewItem::new("widget", 5)).unwrap();

        assert_eq!(
            registry.get("doesnotexist"),
            Err(RegistryError::NotFound {
                id: "doesnotexist".to_string()
            })
        );
    }

    #[test]
    fn invalid_input_stores_nothing() {
        let registry = ItemRegistry::new();

        for bad in [
            NewItem::new("", 5),
            NewItem::new("x".repeat(101), 5),
            NewItem::new("widget", 0),
            NewItem::new("widget", -3),
            NewItem::new("widget", 1_000_001),
        ] {
            let err = registry.create(bad).unwrap_err();
            assert!(matches!(err, RegistryError::Invalid(_)));
        }

        assert!(registry.is_empty());
    }

    #[test]
    fn validation_error_is_surfaced_unchanged() {
        let registry = ItemRegistry::new();
        let err = registry.create(NewItem::new("widget", 0)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Invalid(ValidationError::QuantityRange {
                min: 1,
                max: 1_000_000,
                actual: 0
            })
        );
    }

    #[test]
    fn returned_item_is_a_copy() {
        let registry = ItemRegistry::new();
        let mut item = registry.create(NewItem::new("widget", 5)).unwrap();
        let id = item.id.clone();

        item.name = "tampered".to_string();

        assert_eq!(registry.get(&id).unwrap().name, "widget");
    }

    #[test]
    fn colliding_generator_gives_up() {
        let registry = ItemRegistry::with_id_generator(ConstantIds);
        registry.create(NewItem::new("first", 1)).unwrap();

        assert_eq!(
            registry.create(NewItem::new("second", 1)),
            Err(RegistryError::IdSpaceExhausted {
                attempts: MAX_ID_ATTEMPTS
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_creates_are_all_retrievable() {
        let registry = ItemRegistry::new();
        let n = 16 * 50;

        let items: Vec<Item> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|t| {
                    let registry = registry.clone();
                    s.spawn(move || {
                        (0..50)
                            .map(|i| {
                                registry
                                    .create(NewItem::new(format!("item-{t}-{i}"), i + 1))
                                    .unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), n);
        assert_eq!(registry.len(), n);
        for item in &items {
            assert_eq!(&registry.get(&item.id).unwrap(), item);
        }
    }
}
