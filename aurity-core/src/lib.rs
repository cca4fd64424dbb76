//! Aurity Core
//!
//! Core types for tracking long-running Aurity backend jobs
//! (diarization, transcription, SOAP-note generation).
//!
//! This crate contains:
//! - Domain types: job identifiers, job states, status snapshots, polling options
//! - DTOs: wire representations of the job-status endpoint
//!
//! Note: HTTP transport lives in `aurity-client`, the polling loop in `aurity-poller`.

pub mod domain;
pub mod dto;
pub mod error;

pub use error::{CoreError, Result};
