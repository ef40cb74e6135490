//! taskdash - Task Dashboard Library
//!
//! The engine behind a task-tracking dashboard: an in-memory collection of
//! task records, the only legal ways to change it, and the derived data a
//! dashboard renders from it.
//!
//! # Core Concepts
//!
//! - **Task Record**: one unit of trackable work with a priority, a status
//!   and an ISO due date
//! - **Task Store**: sole owner and mutator of the ordered collection
//! - **View**: a filtered, sorted copy of the collection
//! - **Trend**: how many tasks fall due on each date
//!
//! # Module Organization
//!
//! - `task`: record types and field validation
//! - `store`: the task store
//! - `view`: view projection and its cache
//! - `trend`: due-date aggregation
//! - `stats`: per-status counts
//! - `session`: scripted sessions replayed into one store
//! - `config`: configuration loading from `.taskdash.toml`
//! - `error`: error types and result aliases
//! - `output`: human and JSON output for the CLI
//! - `cli`: command-line interface using clap

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod session;
pub mod stats;
pub mod store;
pub mod task;
pub mod trend;
pub mod view;

pub use error::{Error, Result};
pub use store::{TaskSnapshot, TaskStore};
pub use task::{TaskDraft, TaskPriority, TaskRecord, TaskStatus};
pub use trend::{aggregate_trend, TrendPoint};
pub use view::{project_view, SortDirection, SortKey, StatusFilter, ViewQuery};
