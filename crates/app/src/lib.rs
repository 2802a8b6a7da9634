//! # rundown-app
//!
//! Application layer: the show execution engine and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceControl`: send commands to the video-production device
//!   - `LogSink`: append operator log entries
//!   - `RundownRepository`: load & save the rundown
//! - Provide the playback engine:
//!   - `CommandDispatcher`: one command to one device call, with timeout
//!   - `BlockExecutor`: a block's commands in order, honouring delays
//!   - `Sequencer`: work-paced playback of a list of blocks
//!   - `ShowTimer`: duration-paced playback with pause/resume
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RundownService`: create, update, remove, reorder blocks & containers
//! - Provide **in-process infrastructure** (log bus, in-memory store) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `rundown-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod block_executor;
pub mod dispatcher;
pub mod log_bus;
pub mod ports;
pub mod rundown_store;
pub mod sequencer;
pub mod services;
pub mod show_timer;

#[cfg(test)]
mod testing;
