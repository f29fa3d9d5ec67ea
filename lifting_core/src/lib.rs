#![forbid(unsafe_code)]

//! Core domain model and business logic for the 5/3/1 BBB generator.
//!
//! This crate provides:
//! - Domain types (lifts, program config, prescribed sets, training days)
//! - Program generation and CSV export
//! - Memory snapshots between cycles
//! - Exercise resolution, routine conversion and Hevy sync

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod program;
pub mod export;
pub mod memory;
pub mod routine;
pub mod resolver;
pub mod convert;
pub mod client;
pub mod retry;
pub mod sync;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use memory::Snapshot;
pub use program::generate;
pub use resolver::{AliasTable, ExerciseResolver};
pub use convert::{convert_day, convert_program};
pub use client::{HevyClient, RoutineService};
pub use retry::{Sleeper, ThreadSleeper};
pub use sync::{RoutineSync, SyncOptions, SyncReport};
