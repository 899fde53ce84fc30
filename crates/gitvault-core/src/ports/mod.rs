//! Port definitions (trait interfaces for adapters)

pub mod local_store;
pub mod notification;
pub mod remote_repository;

pub use local_store::{is_binary_extension, ILocalStore};
pub use notification::{INotifier, Notification, NotificationPriority};
pub use remote_repository::{IRemoteRepository, QuotaStatus};
