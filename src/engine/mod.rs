//! Out-of-process engine jobs: transcription and video generation.
//!
//! Engines are opaque executables consumed through a request/response
//! contract; nothing here depends on what they run internally.

mod gateway;
mod response;
mod runner;

pub use gateway::{JobGateway, JobKind, JobPhase};
pub use response::ExportResult;
pub use runner::{resolve_engine_program, CliEngineRunner, EngineOutput, EngineRunner};
