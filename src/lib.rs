//! # Spendwise
//!
//! A personal spending tracker served over HTTP, usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use spendwise::server::{AppState, create_router};
//! use spendwise::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/spendwise.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), "change-me"));
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
