pub use crate::event::{EventKind, TemporalEvent};
pub use crate::geometry::IntersectionMethod;
pub use crate::lifeline::{filter_lifelines, LifeLine};
pub use crate::matching::progress::{
    Cancellation, ChannelProgress, FnProgress, NoopProgress, ProgressNotifier,
};
pub use crate::shape::{BoundaryProvider, HasOutline, OutlineBoundary, ShapeRef, TrackedShape};
pub use crate::tracker::builder::ShapeTrackerBuilder;
pub use crate::tracker::options::{ConsistencyMode, TrackerOptions, DEFAULT_INTERSECT_TOLERANCE};
pub use crate::tracker::{ShapeTracker, TrackingSummary};
pub use crate::Errors;
