use crate::config;
use crate::domain::cart::{CartAction, CartItem, CartState, Money, NewCartItem};
use crate::domain::ports::CartStorageBox;

/// The cart, wired to durable storage.
///
/// Owns the only mutable copy of `CartState`; every mutation goes through the
/// reducer and mirrors the resulting `items` to storage before returning.
/// Storage is best effort: a failed read or write leaves the in-memory state
/// authoritative for the session.
pub struct CartStore {
    state: CartState,
    storage: CartStorageBox,
}

impl CartStore {
    /// Creates a store with an empty cart, skipping hydration.
    pub fn new(storage: CartStorageBox) -> Self {
        Self {
            state: CartState::default(),
            storage,
        }
    }

    /// Creates a store hydrated from storage.
    ///
    /// An absent key, an unreadable backend, or JSON that no longer matches
    /// the item shape all degrade to an empty cart. Never fails.
    pub fn load(storage: CartStorageBox) -> Self {
        let items = match storage.get(config::CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    tracing::warn!(%err, "stored cart is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "cart storage unreadable, starting empty");
                Vec::new()
            }
        };

        let mut store = Self::new(storage);
        if !items.is_empty() {
            store.dispatch(CartAction::Load { items });
        }
        store
    }

    /// Applies an action through the reducer, persisting the new items for
    /// every item mutation. Visibility toggles never touch storage.
    pub fn dispatch(&mut self, action: CartAction) {
        let persist = !matches!(
            action,
            CartAction::SetOpen { .. } | CartAction::ToggleOpen
        );

        self.state = std::mem::take(&mut self.state).apply(action);

        if persist {
            self.persist();
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state.items) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize cart, skipping persist");
                return;
            }
        };
        if let Err(err) = self.storage.set(config::CART_STORAGE_KEY, &json) {
            tracing::warn!(%err, "failed to persist cart");
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn count(&self) -> u32 {
        self.state.count()
    }

    pub fn subtotal(&self) -> Money {
        self.state.subtotal()
    }

    pub fn total(&self) -> Money {
        self.state.total()
    }

    pub fn add_item(&mut self, item: NewCartItem, quantity: u32) {
        self.dispatch(CartAction::AddItem { item, quantity });
    }

    pub fn remove_item(&mut self, id: &str) {
        self.dispatch(CartAction::RemoveItem { id: id.to_string() });
    }

    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.to_string(),
            quantity,
        });
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    pub fn set_open(&mut self, open: bool) {
        self.dispatch(CartAction::SetOpen { open });
    }

    pub fn toggle_open(&mut self) {
        self.dispatch(CartAction::ToggleOpen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::ProductKind;
    use crate::domain::ports::CartStorage;
    use crate::infrastructure::in_memory::InMemoryStorage;

    fn ebook(id: &str, price: u64) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            title: format!("Ebook {id}"),
            description: None,
            price: Money(price),
            kind: ProductKind::Ebook,
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_load_with_absent_key_starts_empty() {
        let store = CartStore::load(Box::new(InMemoryStorage::new()));
        assert!(store.items().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_dispatch_persists_items() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::new(Box::new(storage.clone()));
        store.add_item(ebook("e1", 1500), 2);

        let raw = storage.get(config::CART_STORAGE_KEY).unwrap().unwrap();
        let items: Vec<CartItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_open_toggles_do_not_persist() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::new(Box::new(storage.clone()));
        store.set_open(true);
        store.toggle_open();

        assert!(storage.get(config::CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::new(Box::new(storage.clone()));
        store.add_item(ebook("e1", 1500), 2);
        store.add_item(ebook("e2", 900), 1);
        let saved = store.items().to_vec();

        let reloaded = CartStore::load(Box::new(storage));
        assert_eq!(reloaded.items(), saved.as_slice());
        // Visibility is session state, never hydrated.
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_corrupt_storage_degrades_to_empty() {
        let storage = InMemoryStorage::new();
        storage.set(config::CART_STORAGE_KEY, "{not json").unwrap();

        let store = CartStore::load(Box::new(storage));
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_clear_on_empty_cart_is_noop() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::new(Box::new(storage.clone()));
        store.clear();
        assert!(store.items().is_empty());
        assert_eq!(storage.get(config::CART_STORAGE_KEY).unwrap().unwrap(), "[]");
    }
}
