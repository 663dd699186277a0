//! Ledger calls for hotels.
//!
//! The index contract owns hotel registration; each registered hotel has an
//! address and stores its data index url, its manager and the block it was
//! created in. Implementations wrap whatever ledger client the host uses.

use async_trait::async_trait;
use ledgerproxy_types::{RemoteResult, WriteContext, WriteReceipt};

/// Calls into the hotel contracts on the ledger.
#[async_trait]
pub trait HotelContract: Send + Sync {
    /// Data index url stored for the hotel.
    async fn url(&self, address: &str) -> RemoteResult<Option<String>>;

    /// Account that manages the hotel.
    async fn manager(&self, address: &str) -> RemoteResult<Option<String>>;

    /// Block number the hotel was registered in.
    async fn created(&self, address: &str) -> RemoteResult<Option<u64>>;

    /// Registers a new hotel and returns its address with the transaction receipt.
    async fn register(&self, url: &str, ctx: &WriteContext) -> RemoteResult<(String, WriteReceipt)>;

    /// Replaces the data index url.
    async fn edit_info(&self, address: &str, url: &str, ctx: &WriteContext) -> RemoteResult<WriteReceipt>;

    /// Deregisters the hotel.
    async fn remove(&self, address: &str, ctx: &WriteContext) -> RemoteResult<WriteReceipt>;
}
