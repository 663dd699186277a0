//! Built-in off-chain storage adapters.

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileAdapter;
pub use http::HttpAdapter;
pub use memory::InMemoryAdapter;
