//! Shared test helpers for hotel tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ledgerproxy_hotel::HotelContract;
use ledgerproxy_offchain::{AdapterRegistry, InMemoryAdapter};
use ledgerproxy_types::{RemoteError, RemoteResult, WriteContext, WriteReceipt};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone)]
pub struct HotelRecord {
    pub url: String,
    pub manager: String,
    pub created: u64,
}

#[derive(Default)]
struct Inner {
    hotels: HashMap<String, HotelRecord>,
    calls: HashMap<&'static str, usize>,
    next: u64,
    failing: Option<&'static str>,
}

/// In-memory hotel index contract that counts every call.
#[derive(Clone, Default)]
pub struct MockContract {
    inner: Arc<Mutex<Inner>>,
}

impl MockContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a registered hotel.
    pub fn with_hotel(address: &str, url: &str, manager: &str) -> Self {
        let contract = Self::new();
        contract.inner.lock().unwrap().hotels.insert(
            address.to_string(),
            HotelRecord {
                url: url.to_string(),
                manager: manager.to_string(),
                created: 7,
            },
        );
        contract
    }

    pub fn calls(&self, method: &str) -> usize {
        self.inner.lock().unwrap().calls.get(method).copied().unwrap_or(0)
    }

    pub fn hotel(&self, address: &str) -> Option<HotelRecord> {
        self.inner.lock().unwrap().hotels.get(address).cloned()
    }

    /// Makes every call to `method` fail until [`MockContract::heal`].
    pub fn fail(&self, method: &'static str) {
        self.inner.lock().unwrap().failing = Some(method);
    }

    pub fn heal(&self) {
        self.inner.lock().unwrap().failing = None;
    }

    fn record(&self, method: &'static str) -> RemoteResult<()> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(method).or_default() += 1;
        if inner.failing == Some(method) {
            return Err(RemoteError::Call(format!("{method} unavailable")));
        }
        Ok(())
    }

    fn read<T>(&self, method: &'static str, address: &str, f: impl Fn(&HotelRecord) -> T) -> RemoteResult<Option<T>> {
        self.record(method)?;
        Ok(self.inner.lock().unwrap().hotels.get(address).map(f))
    }

    fn next_tx(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next += 1;
        inner.next
    }
}

#[async_trait]
impl HotelContract for MockContract {
    async fn url(&self, address: &str) -> RemoteResult<Option<String>> {
        tokio::task::yield_now().await;
        self.read("url", address, |h| h.url.clone())
    }

    async fn manager(&self, address: &str) -> RemoteResult<Option<String>> {
        tokio::task::yield_now().await;
        self.read("manager", address, |h| h.manager.clone())
    }

    async fn created(&self, address: &str) -> RemoteResult<Option<u64>> {
        tokio::task::yield_now().await;
        self.read("created", address, |h| h.created)
    }

    async fn register(&self, url: &str, ctx: &WriteContext) -> RemoteResult<(String, WriteReceipt)> {
        self.record("register")?;
        let n = self.next_tx();
        let address = format!("0xhotel{n}");
        self.inner.lock().unwrap().hotels.insert(
            address.clone(),
            HotelRecord {
                url: url.to_string(),
                manager: ctx.sender.clone(),
                created: 100 + n,
            },
        );
        Ok((address, WriteReceipt::new(format!("register-tx{n}"))))
    }

    async fn edit_info(&self, address: &str, url: &str, _ctx: &WriteContext) -> RemoteResult<WriteReceipt> {
        self.record("edit_info")?;
        let n = self.next_tx();
        let mut inner = self.inner.lock().unwrap();
        let hotel = inner
            .hotels
            .get_mut(address)
            .ok_or_else(|| RemoteError::Rejected(format!("no hotel at {address}")))?;
        hotel.url = url.to_string();
        Ok(WriteReceipt::new(format!("edit_info-tx{n}")))
    }

    async fn remove(&self, address: &str, _ctx: &WriteContext) -> RemoteResult<WriteReceipt> {
        self.record("remove")?;
        let n = self.next_tx();
        self.inner
            .lock()
            .unwrap()
            .hotels
            .remove(address)
            .ok_or_else(|| RemoteError::Rejected(format!("no hotel at {address}")))?;
        Ok(WriteReceipt::new(format!("remove-tx{n}")))
    }
}

/// Registry with a `json` in-memory store seeded with a complete hotel:
/// `json://index` pointing at a description, rate plans and availability.
pub async fn seeded_registry() -> (Arc<AdapterRegistry>, InMemoryAdapter) {
    let store = InMemoryAdapter::new("json");
    let registry = Arc::new(AdapterRegistry::new());
    registry.register("json", Arc::new(store.clone())).await;

    let description = store
        .insert(
            "description",
            json!({
                "name": "Seaside Inn",
                "description": "Rooms with a view",
                "currency": "EUR",
                "timezone": "Europe/Lisbon",
                "amenities": ["wifi", "pool"],
            }),
        )
        .await;
    let rate_plans = store.insert("rate-plans", json!({"ratePlans": {"rp1": {"price": 90}}})).await;
    let availability = store.insert("availability", json!({"latestSnapshot": {"rooms": 4}})).await;
    store
        .insert(
            "index",
            json!({
                "descriptionUri": description,
                "ratePlansUri": rate_plans,
                "availabilityUri": availability,
            }),
        )
        .await;

    (registry, store)
}

pub fn ctx() -> WriteContext {
    WriteContext::new("0xowner")
}
