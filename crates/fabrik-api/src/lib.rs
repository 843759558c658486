// fabrik-api: Async Rust client for the Equinix Fabric and Metal control planes.

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::{ApiFamily, Credentials};
pub use client::FabricClient;
pub use error::{Error, ErrorClass};
pub use transport::{TlsMode, TransportConfig};
pub use types::{ApiErrorEntry, ChangeResponse, Page, PatchOperation, Tagged};
