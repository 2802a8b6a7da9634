//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device;
pub mod log_sink;
pub mod rundown_repo;

pub use device::{DeviceCall, DeviceControl};
pub use log_sink::LogSink;
pub use rundown_repo::RundownRepository;
