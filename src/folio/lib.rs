//! # Folio Architecture
//!
//! Folio is a small **flat-file article CMS**. Articles live in one JSON file, the
//! editor's custom display order in another, and uploaded images in a plain
//! directory. Two clients drive it: an HTTP API (for the editor front end and the
//! automation webhook) and a CLI.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients                                                    │
//! │  - cli/ (wired by main.rs): arguments, terminal output      │
//! │  - server/: axum routes, JSON envelopes, status codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands and the upload service         │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) + reconcile.rs               │
//! │  - Business logic: validation, ingestion, ordering          │
//! │  - The listing reconciler is pure and shared by every read  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reads Degrade, Writes Fail
//!
//! Listing endpoints never fail because a store file is missing or corrupt: they
//! log a warning and list nothing. Anything that writes propagates the error, so
//! a broken store is never silently overwritten.
//!
//! ## Hybrid Listings
//!
//! [`hybrid`] merges the local listing with a WordPress-compatible proxy
//! ([`remote`]). Both are fetched concurrently under a timeout and a failing
//! source contributes nothing.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`reconcile`]: Display-order reconciliation and sorting
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Article`, `OrderEntry`, `ArticleStatus`)
//! - [`upload`]: Image upload storage
//! - [`hybrid`] and [`remote`]: Merged listings across sources
//! - [`server`]: HTTP routes and handlers
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod hybrid;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod server;
pub mod store;
pub mod upload;
