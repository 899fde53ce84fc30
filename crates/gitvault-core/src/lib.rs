//! GitVault Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `RemoteFileEntry`, `SyncStateDocument`, `FileChangeIntent`, `SyncOutcome`
//! - **Error taxonomy** - the tagged `SyncError` enum every run outcome is built from
//! - **Port definitions** - Traits for adapters: `IRemoteRepository`, `ILocalStore`, `INotifier`
//! - **Configuration** - typed config with the repository-slug parse rule
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies;
//! in particular the manifest-vs-state diff algorithm lives on
//! [`domain::state::SyncStateDocument`] and is fully testable without I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
