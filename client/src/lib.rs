//! BeFit client storage layer
//!
//! A single `DietStore` interface with a remote (HTTP API) and a local
//! (JSON document) implementation. `FallbackStore` picks between them by an
//! injected `StorageStrategy`, and `Diary` builds the user-facing flows on
//! top of any store. Sessions are explicit values passed into every call.

pub mod config;
pub mod diary;
pub mod error;
pub mod session;
pub mod store;

pub use config::ClientConfig;
pub use diary::Diary;
pub use error::{StoreError, StoreResult};
pub use session::Session;
pub use store::{
    build_store, DietStore, FallbackStore, LocalStore, RemoteStore, StorageStrategy,
};
