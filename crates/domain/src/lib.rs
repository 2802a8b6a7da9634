//! # rundown-domain
//!
//! Pure domain model for the rundown show-control system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Commands** (one instruction for the video-production device)
//! - Define **Blocks** (show segments with a duration and a command list)
//! - Define the **Rundown** (ordered blocks, optionally grouped in containers)
//!   and its flattened executable view
//! - Define the **Run State** machine (idle → running ⇄ paused → completed)
//! - Duration and schedule arithmetic
//! - Operator **log entries**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod block;
pub mod command;
pub mod duration;
pub mod log;
pub mod run_state;
pub mod rundown;
