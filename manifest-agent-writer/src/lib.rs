//! # manifest-agent-writer
//!
//! Manifest assembly and the temp-write + fsync + rename writer.
//!
//! Call [`pipeline::prepare`] once the invocation is known, then
//! [`pipeline::run`] to validate the cycle and write its manifest.

pub mod assemble;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use assemble::{assemble, Assembled, COLLISION_PAUSE};
pub use error::CycleError;
pub use pipeline::{prepare, run, CycleOutcome, CycleRequest, PreparedCycle};
pub use writer::write_manifest;
