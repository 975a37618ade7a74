use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use market_cart::prelude::*;
use market_cart::DEFAULT_STORAGE_KEY;
use market_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
use tempfile::TempDir;

/// Memory store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}

/// Memory store with slow writes, so persists overlap.
#[derive(Default)]
struct SlowStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        // Earlier writes take longer, so unserialized writes would land out of order.
        tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(n as u64 * 5))).await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}

fn item(id: &str, price: f64) -> NewLineItem {
    NewLineItem::new(id, format!("Product {}", id), format!("https://img/{}.png", id), price)
}

async fn stored<S: KeyValueStore>(store: &CartStore<S>) -> Option<CartState> {
    store
        .backend()
        .get(&store.config().storage_key)
        .await
        .unwrap()
        .map(|raw| CartState::from_snapshot(&raw).unwrap())
}

#[tokio::test]
async fn distinct_adds_yield_one_entry_each() {
    let store = CartStore::new(MemoryStore::new());
    store.load().await.unwrap();

    for n in 0..20 {
        store.add_to_cart(item(&format!("p{}", n), 1.0)).await.unwrap();
    }

    let cart = store.products();
    assert_eq!(cart.len(), 20);
    assert!(cart.iter().all(|i| i.quantity == 1));
}

#[tokio::test]
async fn repeated_add_keeps_first_fields() {
    let store = CartStore::new(MemoryStore::new());
    store.load().await.unwrap();

    store
        .add_to_cart(NewLineItem::new("A", "Chair", "chair.png", 400.0))
        .await
        .unwrap();
    store
        .add_to_cart(NewLineItem::new("A", "Sofa", "sofa.png", 900.0))
        .await
        .unwrap();

    let cart = store.products();
    assert_eq!(cart.len(), 1);
    let a = cart.get(&ProductId::new("A")).unwrap();
    assert_eq!(a.quantity, 2);
    assert_eq!(a.title, "Chair");
    assert_eq!(a.image_url, "chair.png");
    assert_eq!(a.unit_price, 400.0);
}

#[tokio::test]
async fn unknown_ids_are_noops() {
    let store = CartStore::new(MemoryStore::new());
    store.load().await.unwrap();
    store.add_to_cart(item("A", 1.0)).await.unwrap();
    let before = store.products();

    store.increment(&ProductId::new("missing")).await.unwrap();
    store.decrement(&ProductId::new("missing")).await.unwrap();

    assert_eq!(store.products(), before);
}

#[tokio::test]
async fn add_increment_decrement_scenario() {
    let store = CartStore::new(MemoryStore::new());
    store.load().await.unwrap();

    store.add_to_cart(item("A", 10.0)).await.unwrap();
    store.add_to_cart(item("B", 5.0)).await.unwrap();
    store.increment(&ProductId::new("A")).await.unwrap();
    store.decrement(&ProductId::new("B")).await.unwrap();

    let cart = store.products();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].id, "A");
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(stored(&store).await.unwrap(), cart);
}

#[tokio::test]
async fn persisted_cart_reloads_equal() {
    let backend = Arc::new(MemoryStore::new());

    let first = CartStore::new(Arc::clone(&backend));
    first.load().await.unwrap();
    first.add_to_cart(item("B", 5.0)).await.unwrap();
    first.add_to_cart(item("A", 10.0)).await.unwrap();
    first.increment(&ProductId::new("B")).await.unwrap();

    let second = CartStore::new(Arc::clone(&backend));
    second.load().await.unwrap();
    assert_eq!(second.products(), first.products());
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let provider = CartProvider::new(
            FileStore::open(dir.path()).await.unwrap(),
            CartConfig::default(),
        );
        let scope = provider.mount().await.unwrap();
        let cart = scope.use_cart().unwrap();
        cart.add_to_cart(item("A", 10.0)).await.unwrap();
        cart.add_to_cart(item("A", 10.0)).await.unwrap();
    }

    let provider = CartProvider::new(
        FileStore::open(dir.path()).await.unwrap(),
        CartConfig::default(),
    );
    let scope = provider.mount().await.unwrap();
    let cart = scope.use_cart().unwrap().products();
    assert_eq!(cart.get(&ProductId::new("A")).unwrap().quantity, 2);
}

#[tokio::test]
async fn failed_write_surfaces_and_keeps_memory() {
    let store = CartStore::new(FlakyStore::default());
    store.load().await.unwrap();
    store.backend().fail_writes.store(true, Ordering::SeqCst);

    let err = store.add_to_cart(item("A", 1.0)).await.unwrap_err();
    assert!(matches!(err, CartError::PersistenceWrite { .. }));
    assert!(err.is_persistence_divergence());
    assert_eq!(store.products().len(), 1);
    assert!(stored(&store).await.is_none());

    store.backend().fail_writes.store(false, Ordering::SeqCst);
    store.flush().await.unwrap();
    assert_eq!(stored(&store).await.unwrap(), store.products());
}

#[tokio::test]
async fn next_mutation_after_failed_write_catches_up() {
    let store = CartStore::new(FlakyStore::default());
    store.load().await.unwrap();

    store.backend().fail_writes.store(true, Ordering::SeqCst);
    assert!(store.add_to_cart(item("A", 1.0)).await.is_err());

    store.backend().fail_writes.store(false, Ordering::SeqCst);
    store.add_to_cart(item("B", 1.0)).await.unwrap();

    let persisted = stored(&store).await.unwrap();
    assert_eq!(persisted.len(), 2);
}

#[tokio::test]
async fn overlapping_mutations_settle_on_latest_state() {
    let store = CartStore::new(SlowStore::default());
    store.load().await.unwrap();

    let ops = vec![
        store.add_to_cart(item("A", 1.0)),
        store.add_to_cart(item("B", 1.0)),
        store.add_to_cart(item("A", 1.0)),
        store.add_to_cart(item("C", 1.0)),
        store.add_to_cart(item("A", 1.0)),
    ];
    for result in futures::future::join_all(ops).await {
        result.unwrap();
    }

    let cart = store.products();
    assert_eq!(cart.get(&ProductId::new("A")).unwrap().quantity, 3);
    assert_eq!(stored(&store).await.unwrap(), cart);
    assert!(store.backend().writes.load(Ordering::SeqCst) < 5);
}

#[tokio::test]
async fn reset_behind_pending_writes_removes_snapshot() {
    let store = CartStore::new(SlowStore::default());
    store.load().await.unwrap();

    // The second add's write picks up the already-reset cart and stores "[]";
    // the reset queued behind it must still delete the key.
    let (a, b, reset) = tokio::join!(
        store.add_to_cart(item("A", 1.0)),
        store.add_to_cart(item("B", 1.0)),
        store.reset(),
    );
    a.unwrap();
    b.unwrap();
    reset.unwrap();

    assert!(store.products().is_empty());
    assert_eq!(
        store.backend().get(DEFAULT_STORAGE_KEY).await.unwrap(),
        None
    );

    store.add_to_cart(item("C", 1.0)).await.unwrap();
    assert_eq!(stored(&store).await.unwrap(), store.products());
}

#[tokio::test]
async fn overflow_is_rejected_and_not_persisted() {
    let raw = format!(
        r#"[{{"id":"A","title":"Mug","image_url":"","price":10,"quantity":{}}}]"#,
        u32::MAX
    );
    let store = CartStore::new(FlakyStore::default());
    store.backend().inner.set(DEFAULT_STORAGE_KEY, raw.clone()).await.unwrap();
    store.load().await.unwrap();

    let err = store.increment(&ProductId::new("A")).await.unwrap_err();
    assert!(matches!(err, CartError::Overflow(ref id) if *id == "A"));
    assert!(!err.is_persistence_divergence());

    assert_eq!(
        store.products().get(&ProductId::new("A")).unwrap().quantity,
        u32::MAX
    );
    assert_eq!(
        store.backend().get(DEFAULT_STORAGE_KEY).await.unwrap(),
        Some(raw)
    );
}

#[tokio::test]
async fn detached_scope_rejects_access() {
    let scope: CartScope<MemoryStore> = CartScope::default();
    assert!(matches!(
        scope.use_cart(),
        Err(CartError::ContractViolation(_))
    ));
}

#[tokio::test]
async fn mobile_snapshot_loads() {
    let raw = r#"[
        {"id":"1","title":"Cadeira Rivatti","image_url":"https://x/1.jpg","price":1400,"quantity":1},
        {"id":"2","title":"Poltrona de madeira","image_url":"https://x/2.jpg","price":360.5,"quantity":4}
    ]"#;
    let store = CartStore::new(MemoryStore::with_entries([(DEFAULT_STORAGE_KEY, raw)]));
    store.load().await.unwrap();

    let cart = store.products();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 5);
}
