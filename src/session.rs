//! Export Session
//!
//! Tracks the lifecycle of each input dataset independently:
//!
//! ```text
//! Empty ──begin──▶ Parsing ──finish(Ok)──▶ Ready
//!   ▲                 │
//!   │                 └──finish(Err)──▶ Failed
//!   └─ Ready / Failed may begin again (re-upload)
//! ```
//!
//! Bore, surface and boring logs each have their own state, so a failed
//! surface parse never disturbs an accepted bore. The water body is plain
//! optional input with no parse step.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::assembler::{assemble, AssembleError, Overlays, VizDataset};
use crate::config::VizConfig;
use crate::geometry::LayerMethod;
use crate::ingest::{self, BoringLogBatch, DatasetKind, Parsed};
use crate::types::{BoreJoint, SurfacePoint, WaterBodyRegion};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("bore data is not ready ({0})")]
    BoreNotReady(String),

    #[error("{0} dataset finished without being started")]
    NotParsing(DatasetKind),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

// ============================================================================
// Dataset State
// ============================================================================

/// Lifecycle of one input dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DatasetState<T> {
    #[default]
    Empty,
    Parsing,
    Ready(T),
    Failed(String),
}

impl<T> DatasetState<T> {
    /// Start a (re)load. Any previous data or error is discarded.
    pub fn begin(&mut self) {
        *self = Self::Parsing;
    }

    /// Record the outcome of the load started by [`begin`](Self::begin).
    pub fn finish<E: fmt::Display>(&mut self, kind: DatasetKind, result: Result<T, E>) -> Result<(), SessionError> {
        if !matches!(self, Self::Parsing) {
            return Err(SessionError::NotParsing(kind));
        }
        *self = match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        };
        Ok(())
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<T> fmt::Display for DatasetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Parsing => write!(f, "Parsing"),
            Self::Ready(_) => write!(f, "Ready"),
            Self::Failed(e) => write!(f, "Failed: {e}"),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// All inputs of one export run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub bore: DatasetState<Parsed<BoreJoint>>,
    pub surface: DatasetState<Parsed<SurfacePoint>>,
    pub boring_logs: DatasetState<BoringLogBatch>,
    pub water_body: Option<WaterBodyRegion>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_bore(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.bore.begin();
        let result = ingest::load_bore(path).await;
        log_failure(DatasetKind::Bore, &result);
        self.bore.finish(DatasetKind::Bore, result)
    }

    pub async fn load_surface(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.surface.begin();
        let result = ingest::load_surface(path).await;
        log_failure(DatasetKind::Surface, &result);
        self.surface.finish(DatasetKind::Surface, result)
    }

    pub async fn load_boring_logs<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), SessionError> {
        self.boring_logs.begin();
        let result = ingest::load_boring_logs(paths).await;
        log_failure(DatasetKind::BoringLog, &result);
        self.boring_logs.finish(DatasetKind::BoringLog, result)
    }

    pub fn set_water_body(&mut self, region: Option<WaterBodyRegion>) {
        self.water_body = region;
    }

    /// Assemble the visualization from whatever is ready.
    ///
    /// The bore must be ready. Failed overlays are left out with a warning.
    pub fn assemble(&self, method: LayerMethod, config: &VizConfig) -> Result<VizDataset, SessionError> {
        let bore = self
            .bore
            .ready()
            .ok_or_else(|| SessionError::BoreNotReady(self.bore.to_string()))?;

        if let DatasetState::Failed(e) = &self.surface {
            tracing::warn!(error = %e, "Surface data failed to load, exporting without terrain");
        }
        if let DatasetState::Failed(e) = &self.boring_logs {
            tracing::warn!(error = %e, "Boring logs failed to load, exporting without soil layers");
        }

        let overlays = Overlays {
            surface: self.surface.ready().map(|p| p.records.as_slice()).unwrap_or_default(),
            boring_logs: self.boring_logs.ready().map(|b| b.layers.as_slice()).unwrap_or_default(),
            water_body: self.water_body.as_ref(),
        };

        Ok(assemble(&bore.records, overlays, method, config)?)
    }
}

fn log_failure<T>(kind: DatasetKind, result: &Result<T, ingest::ParseError>) {
    if let Err(e) = result {
        tracing::error!(kind = %kind, error = %e, "Failed to load dataset");
    }
}
