/// Sequential per-frame event classification
///
pub mod classifier;

/// Temporal events a shape takes part in
///
pub mod event;

/// Shape generators used by tests and benchmarks
///
pub mod examples;

/// Polygon area and intersection primitives
///
pub mod geometry;

/// Life-lines and the arena that owns them while tracking
///
pub mod lifeline;

/// Pairwise overlap scores between consecutive frames
///
pub mod matching;

pub mod prelude;

/// Touch/de-touch reconciliation of fused and split life-lines
///
pub mod reconcile;

/// Overlap score between two shape boundaries
///
pub mod scoring;

/// Shape handles and the boundary capability
///
pub mod shape;

/// Tracker facade, builder and options
///
pub mod tracker;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Errors {
    #[error("Boundary provider is not set - shapes cannot be scored.")]
    MissingBoundaryProvider,
    #[error("Intersect tolerance must belong to [0, 1), got {0}.")]
    InvalidTolerance(f64),
    #[error("Shape {shape} of frame {frame} has no open life-line to continue.")]
    TrackingInconsistency { frame: usize, shape: usize },
    #[error("Matching phase was cancelled.")]
    Cancelled,
}

pub(crate) const EPS: f64 = 0.00001;
