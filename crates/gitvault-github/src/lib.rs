//! GitHub REST API adapter for GitVault
//!
//! Implements the [`IRemoteRepository`](gitvault_core::ports::IRemoteRepository)
//! port against the GitHub v3 REST API plus the raw content mirror:
//!
//! - [`client`] - typed HTTP client: auth headers, status classification,
//!   reachability probe, quota query
//! - [`tree`] - recursive tree listing → [`RemoteManifest`](gitvault_core::domain::RemoteManifest)
//! - [`content`] - file byte retrieval with the three-tier large-file
//!   fallback chain
//! - [`provider`] - the port implementation wiring the above together

pub mod client;
pub mod content;
pub mod provider;
pub mod tree;

pub use client::GithubClient;
pub use provider::GithubRemoteRepository;
