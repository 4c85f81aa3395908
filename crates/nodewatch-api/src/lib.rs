// nodewatch-api: Async Rust client for the storage-node dashboard backend

pub mod client;
pub mod error;
pub mod models;
mod nodes;
pub mod transport;

pub use client::NodesClient;
pub use error::Error;
pub use models::{
    BackendStatus, HealthResponse, NetworkStats, NodesQuery, NodesResponse, PaginationMeta, RawNode,
};
pub use transport::{TlsMode, TransportConfig};
