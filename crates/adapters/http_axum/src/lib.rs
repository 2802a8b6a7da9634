//! # rundown-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for editing the rundown
//!   (`/api/rundown`, `/api/blocks`, `/api/containers`, …)
//! - Expose the playback controls of the show timer (`/api/show/*`) and the
//!   sequencer (`/api/sequence/*`)
//! - Stream the operator log over **Server-Sent Events** (`/api/logs/stream`)
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `rundown-app` (for port traits and services) and
//! `rundown-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
