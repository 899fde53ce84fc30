//! Sync reconciliation engine for GitVault
//!
//! - [`engine`] - the [`SyncEngine`](engine::SyncEngine) orchestrator:
//!   manifest → diff → batched apply → persist, with the single-flight
//!   guard and per-file error aggregation
//! - [`state`] - durable [`SyncStateStore`](state::SyncStateStore) over
//!   the local storage port
//! - [`vault`] - [`VaultStore`](vault::VaultStore), the filesystem
//!   implementation of the local storage port

pub mod engine;
pub mod state;
pub mod vault;

pub use engine::SyncEngine;
pub use state::SyncStateStore;
pub use vault::VaultStore;
