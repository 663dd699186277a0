//! Hotel entities for ledgerproxy.
//!
//! A [`Hotel`] is the first consumer of both halves of ledgerproxy: its
//! ledger fields are a remote-backed dataset driven by a [`HotelContract`],
//! and its descriptive data is a tree of off-chain documents rooted at the
//! ledger `url`.
//!
//! ```no_run
//! # use ledgerproxy_hotel::{Hotel, HotelContract, HotelResult};
//! # use ledgerproxy_offchain::AdapterRegistry;
//! # use ledgerproxy_types::WriteContext;
//! # use std::sync::Arc;
//! # async fn run(contract: Arc<dyn HotelContract>, registry: Arc<AdapterRegistry>) -> HotelResult<()> {
//! let hotel = Hotel::new(contract, registry);
//! hotel.set_url("json://index").await?;
//! hotel.create_on_network(&WriteContext::new("0xowner")).await?;
//!
//! let name = hotel.description().await?.get_value("name").await?;
//! # Ok(())
//! # }
//! ```

mod contract;
mod error;
mod hotel;
pub mod schema;

pub use contract::HotelContract;
pub use error::{HotelError, HotelResult};
pub use hotel::Hotel;
