//! Data Transfer Objects for the job-status endpoints
//!
//! DTOs mirror the JSON the backend sends. They are converted into domain
//! snapshots once the receiving side has stamped them.

pub mod job;
