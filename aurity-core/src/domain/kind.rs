//! Job kinds
//!
//! The backend runs several families of long jobs. They share one status
//! contract and one polling algorithm, and differ only in where their
//! status lives and how fast they tend to progress.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::options::PollingOptions;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Speaker diarization of a recorded consultation
    Diarization,
    /// Speech-to-text of uploaded audio chunks
    Transcription,
    /// SOAP note generation from a transcript
    SoapNote,
    /// Any job exposed on the plain `/jobs/{id}/status` route
    Generic,
}

impl JobKind {
    /// Route segment under `/api`, `None` for the generic route
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Self::Diarization => Some("diarization"),
            Self::Transcription => Some("transcription"),
            Self::SoapNote => Some("soap"),
            Self::Generic => None,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Diarization => "Diarization",
            Self::Transcription => "Transcription",
            Self::SoapNote => "SOAP note",
            Self::Generic => "Job",
        }
    }

    /// Auxiliary fields `(done, total, unit)` used for status lines
    pub fn progress_fields(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            Self::Diarization => Some(("segments_processed", "total_segments", "segments")),
            Self::Transcription => Some(("chunks_processed", "total_chunks", "chunks")),
            Self::SoapNote => Some(("sections_completed", "total_sections", "sections")),
            Self::Generic => None,
        }
    }

    /// Default polling cadence for this kind
    pub fn default_options(&self) -> PollingOptions {
        let base = PollingOptions::default();
        match self {
            // Long audio: progress arrives in bursts, give up after ~30 minutes
            Self::Diarization => base
                .with_max_interval(Duration::from_secs(10))
                .with_backoff_multiplier(1.5)
                .with_max_attempts(360),
            Self::Transcription => base.with_max_attempts(240),
            // LLM generation: slower start, few progress steps
            Self::SoapNote => base
                .with_initial_interval(Duration::from_secs(2))
                .with_max_interval(Duration::from_secs(15))
                .with_backoff_multiplier(1.5)
                .with_max_attempts(120),
            Self::Generic => base,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diarization => "diarization",
            Self::Transcription => "transcription",
            Self::SoapNote => "soap-note",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}

impl FromStr for JobKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diarization" => Ok(Self::Diarization),
            "transcription" => Ok(Self::Transcription),
            "soap" | "soap-note" | "soap_note" => Ok(Self::SoapNote),
            "generic" | "job" => Ok(Self::Generic),
            other => Err(CoreError::UnknownJobKind(other.to_string())),
        }
    }
}
