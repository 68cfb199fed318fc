//! The Move Core Library
//!
//! Move models, normalization, the filter engine, mutations and storage for
//! The Move campus event board.

pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod invariants;
pub mod models;
pub mod mutations;
pub mod normalize;
pub mod seed;
pub mod storage;
pub mod time;

pub use config::{BoardConfig, ConfigError, StorageBackend};
pub use error::{Error, Result, ValidationError};
pub use filter::{FilterTag, MoveFilter};
pub use models::*;
pub use mutations::{JoinOutcome, LeaveOutcome, MoveDraft};
pub use storage::{
    load_or_seed, Database, DocumentMoveStore, LocalMoveStore, MoveStore, SavedMovesStore,
};
