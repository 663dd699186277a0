//! The hotel entity.
//!
//! A hotel keeps three values on the ledger (`url`, `manager`, `created`)
//! and everything else in off-chain documents reachable from `url`. Ledger
//! fields go through a [`RemoteBackedDataset`]; the data index is a
//! [`StoragePointer`] rebuilt whenever the url changes.

use crate::contract::HotelContract;
use crate::error::{HotelError, HotelResult};
use crate::schema;
use async_trait::async_trait;
use ledgerproxy_dataset::{
    DatasetError, FieldDef, FieldValues, Lifecycle, RemoteBackedDataset, RemoteGetter,
    RemoteSetter, SetterGroup,
};
use ledgerproxy_offchain::{AdapterRegistry, StoragePointer};
use ledgerproxy_types::{RemoteError, RemoteResult, Value, WriteContext, WriteReceipt};
use serde_json::Map;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// Set once, when the hotel is registered or opened at a known address.
type SharedAddress = Arc<OnceCell<String>>;

#[derive(Debug, Clone, Copy)]
enum LedgerField {
    Url,
    Manager,
    Created,
}

struct ContractGetter {
    contract: Arc<dyn HotelContract>,
    address: SharedAddress,
    field: LedgerField,
}

#[async_trait]
impl RemoteGetter for ContractGetter {
    async fn fetch(&self) -> RemoteResult<Option<Value>> {
        let address = self.address.get().ok_or(RemoteError::NotDeployed)?;
        Ok(match self.field {
            LedgerField::Url => self.contract.url(address).await?.map(Value::from),
            LedgerField::Manager => self.contract.manager(address).await?.map(Value::from),
            LedgerField::Created => self.contract.created(address).await?.map(Value::from),
        })
    }
}

/// `editInfo` persists the url.
struct EditInfo {
    contract: Arc<dyn HotelContract>,
    address: SharedAddress,
}

#[async_trait]
impl RemoteSetter for EditInfo {
    async fn write(&self, ctx: &WriteContext, values: &FieldValues) -> RemoteResult<WriteReceipt> {
        let address = self.address.get().ok_or(RemoteError::NotDeployed)?;
        let url = values
            .get_str("url")
            .ok_or_else(|| RemoteError::Rejected("url must be a string".to_string()))?;
        self.contract.edit_info(address, url, ctx).await
    }
}

/// A hotel registered (or about to be registered) in the hotel index.
pub struct Hotel {
    contract: Arc<dyn HotelContract>,
    registry: Arc<AdapterRegistry>,
    address: SharedAddress,
    dataset: RemoteBackedDataset,
    data_index: Mutex<Option<Arc<StoragePointer>>>,
}

impl Hotel {
    /// A hotel that does not exist on the ledger yet.
    pub fn new(contract: Arc<dyn HotelContract>, registry: Arc<AdapterRegistry>) -> Self {
        Self::build(OnceCell::new(), contract, registry)
    }

    /// A hotel already registered at `address`.
    pub fn at(
        address: impl Into<String>,
        contract: Arc<dyn HotelContract>,
        registry: Arc<AdapterRegistry>,
    ) -> Self {
        Self::build(OnceCell::from(address.into()), contract, registry)
    }

    fn build(
        address: OnceCell<String>,
        contract: Arc<dyn HotelContract>,
        registry: Arc<AdapterRegistry>,
    ) -> Self {
        let address = Arc::new(address);
        let deployed = address.initialized();

        let getter = |field: LedgerField| -> Arc<dyn RemoteGetter> {
            Arc::new(ContractGetter {
                contract: contract.clone(),
                address: address.clone(),
                field,
            })
        };
        let edit_info = SetterGroup::from_setter(
            "editInfo",
            Arc::new(EditInfo {
                contract: contract.clone(),
                address: address.clone(),
            }),
        );

        let fields = [
            FieldDef::new("url")
                .with_remote_getter(getter(LedgerField::Url))
                .with_setter(edit_info),
            FieldDef::new("manager").with_remote_getter(getter(LedgerField::Manager)),
            FieldDef::new("created").with_remote_getter(getter(LedgerField::Created)),
        ];
        let dataset = if deployed {
            RemoteBackedDataset::bind_deployed(fields)
        } else {
            RemoteBackedDataset::bind(fields)
        };

        Self {
            contract,
            registry,
            address,
            dataset,
            data_index: Mutex::new(None),
        }
    }

    /// Ledger address, once registered.
    pub fn address(&self) -> Option<&str> {
        self.address.get().map(String::as_str)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.dataset.lifecycle()
    }

    /// The dataset mirroring the ledger fields.
    pub fn dataset(&self) -> &RemoteBackedDataset {
        &self.dataset
    }

    // ── Ledger fields ────────────────────────────────────────────

    pub async fn url(&self) -> HotelResult<Option<String>> {
        self.string_field("url").await
    }

    /// Changes the url locally. [`Hotel::update_on_network`] persists it.
    pub async fn set_url(&self, url: impl Into<String>) -> HotelResult<()> {
        Ok(self.dataset.set("url", Value::String(url.into())).await?)
    }

    pub async fn manager(&self) -> HotelResult<Option<String>> {
        self.string_field("manager").await
    }

    /// Changes the manager locally. The contract has no call to transfer
    /// management, so the change is never written.
    pub async fn set_manager(&self, manager: impl Into<String>) -> HotelResult<()> {
        Ok(self.dataset.set("manager", Value::String(manager.into())).await?)
    }

    /// Block the hotel was registered in.
    pub async fn created(&self) -> HotelResult<Option<u64>> {
        Ok(self.dataset.get("created").await?.and_then(|v| v.as_u64()))
    }

    async fn string_field(&self, name: &str) -> HotelResult<Option<String>> {
        Ok(self
            .dataset
            .get(name)
            .await?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    // ── Off-chain data ───────────────────────────────────────────

    /// The data index document at the current url.
    ///
    /// The pointer is cached until the url changes, so repeated calls share
    /// one download.
    pub async fn data_index(&self) -> HotelResult<Arc<StoragePointer>> {
        let url = self.url().await?.ok_or(HotelError::MissingUrl)?;

        let mut cached = self.data_index.lock().await;
        if let Some(pointer) = cached.as_ref().filter(|p| p.reference() == url) {
            return Ok(pointer.clone());
        }

        debug!("Opening data index at {}", url);
        let pointer = Arc::new(StoragePointer::new(
            url,
            schema::data_index(),
            self.registry.clone(),
        ));
        *cached = Some(pointer.clone());
        Ok(pointer)
    }

    /// Description document, reached through the data index.
    pub async fn description(&self) -> HotelResult<Arc<StoragePointer>> {
        Ok(self.data_index().await?.get_pointer(schema::DESCRIPTION).await?)
    }

    // ── Ledger lifecycle ─────────────────────────────────────────

    /// Registers the hotel with its current url.
    pub async fn create_on_network(&self, ctx: &WriteContext) -> HotelResult<WriteReceipt> {
        if let Some(address) = self.address() {
            return Err(HotelError::AlreadyDeployed(address.to_string()));
        }
        let url = self.url().await?.ok_or(HotelError::MissingUrl)?;

        let (address, receipt) = self.contract.register(&url, ctx).await?;
        self.address
            .set(address.clone())
            .map_err(|_| HotelError::AlreadyDeployed(address.clone()))?;

        self.dataset.mark_deployed()?;
        // Registration already stored the url.
        self.dataset.mark_synced(&["url"]).await?;

        info!("Hotel registered at {} ({})", address, receipt.id);
        Ok(receipt)
    }

    /// Writes every locally changed ledger field.
    pub async fn update_on_network(&self, ctx: &WriteContext) -> HotelResult<Vec<WriteReceipt>> {
        if self.address().is_none() {
            return Err(HotelError::NotDeployed);
        }
        let receipts = self.dataset.flush_writes(ctx).await?;
        debug!("Hotel update sent {} transactions", receipts.len());
        Ok(receipts)
    }

    /// Deregisters the hotel. Every later access fails.
    pub async fn remove_from_network(&self, ctx: &WriteContext) -> HotelResult<WriteReceipt> {
        let address = self.address().ok_or(HotelError::NotDeployed)?;
        if self.dataset.is_obsolete() {
            return Err(HotelError::Dataset(DatasetError::ObsoleteAccess {
                dataset: self.dataset.id(),
                operation: "remove_from_network",
            }));
        }

        let receipt = self.contract.remove(address, ctx).await?;
        self.dataset.mark_obsolete();
        self.data_index.lock().await.take();

        info!("Hotel at {} removed ({})", address, receipt.id);
        Ok(receipt)
    }

    /// Ledger fields plus the off-chain data resolved `depth` documents deep.
    ///
    /// Depth `0` stays on the ledger; `1` adds the data index with its
    /// pointers left as urls; each further level resolves one more document.
    pub async fn to_plain_object(&self, depth: usize) -> HotelResult<Value> {
        let mut object = match self.dataset.to_plain_object().await? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        if let Some(address) = self.address() {
            object.insert("address".to_string(), Value::from(address));
        }

        if depth > 0 && self.url().await?.is_some() {
            let index = self.data_index().await?;
            object.insert("dataIndex".to_string(), index.to_plain_object(depth - 1).await?);
        }

        Ok(Value::Object(object))
    }
}

impl std::fmt::Debug for Hotel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hotel")
            .field("address", &self.address())
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
