//! Services module - framework-agnostic logic behind the launcher shell.
//!
//! Everything here is UI-free and testable in isolation:
//!
//! - [`CollectionLoader`]: the two-stage asynchronous catalog load with its
//!   empty-collection fallback policy and [`CollectionError`] taxonomy.
//! - [`ImageIndex`]: the platform-to-thumbnail lookup structure, populated
//!   once platform names are known and never rescanned per lookup.
//! - [`LogBridge`] / [`LogChannel`]: the push channel of full log snapshots
//!   from the background process, with scoped subscribe/replay/unsubscribe.
//!
//! The orchestration of these services - sequencing, cancellation, and the
//! atomic central-state join - lives in [`crate::shell`].

pub mod collection;
pub mod images;
pub mod logs;

pub use collection::{CollectionError, CollectionLoader, LoadOutcome};
pub use images::ImageIndex;
pub use logs::{InProcessLogChannel, LogBridge, LogChannel, LogSubscription, LogToken};
