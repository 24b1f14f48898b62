//! # Storage Layer
//!
//! Persistence and configuration for the deduction sheet.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Sheet | JSON snapshot | `<data dir>/clue-sheet/sheet.json` or `--state` |
//! | Config | TOML | `<config dir>/clue-sheet/config.toml` or `--config` |
//!
//! ## Failure Model
//!
//! Persistence never takes the session down:
//! - a missing, corrupt or invalid snapshot opens a fresh sheet
//! - a failed save is logged and the in-memory change is kept
//!
//! ## Concurrency Safety
//!
//! - [`JsonFileStore`] holds a shared `fs2` lock on the sheet while reading
//! - Writers hold an exclusive lock on the `sheet.json.lock` sidecar
//! - Writes are atomic (unique temp file + rename)
//!
//! ## Key Types
//!
//! - [`Snapshot`] - Serializable roster + marks
//! - [`SnapshotStore`] - Load/save seam, with [`JsonFileStore`] and [`MemoryStore`]
//! - [`Notebook`] - A session that saves after every change
//! - [`Config`] - User configuration

mod config;
mod notebook;
mod snapshot;
mod store;

pub use config::{Config, ConfigError, OutputFormat};
pub use notebook::{LoadOutcome, Notebook};
pub use snapshot::{MarkEntries, Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, StoreError};
