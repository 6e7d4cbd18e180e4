/// Builder of the shape tracker
///
pub mod builder;

/// Tracking options
///
pub mod options;


use crate::classifier::EventClassifier;
use crate::event::{EventKind, TemporalEvent};
use crate::lifeline::store::LifeLineStore;
use crate::lifeline::LifeLine;
use crate::matching::progress::{Cancellation, ProgressNotifier};
use crate::matching::{build_boundary_cache, build_matching_map, BoundaryCache};
use crate::reconcile::Reconciler;
use crate::scoring::optional_overlap_score;
use crate::shape::{BoundaryProvider, ShapeRef, TrackedShape};
use crate::tracker::options::TrackerOptions;
use anyhow::Result;
use log::{debug, info};
use rayon::ThreadPool;
use std::collections::BTreeMap;
use std::fmt;

/// Reconstructs life-lines of shapes detected independently in every frame.
///
/// The tracker is configured once with [`builder::ShapeTrackerBuilder`] and may be run on
/// any number of sequences. Every [`ShapeTracker::track`] call works on its own data and
/// keeps nothing once it returns.
///
pub struct ShapeTracker<S> {
    provider: Box<dyn BoundaryProvider<S>>,
    options: TrackerOptions,
    progress: Box<dyn ProgressNotifier>,
    cancellation: Cancellation,
    pool: ThreadPool,
    shards: usize,
}

impl<S> ShapeTracker<S>
where
    S: TrackedShape,
{
    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Handle that stops the matching phase of the running session.
    ///
    /// A cancellation requested before [`ShapeTracker::track`] stops the next call. The flag is
    /// re-armed when `track` returns, so the following call runs from scratch.
    ///
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Tracks the shapes of `frames` (ordered by time).
    ///
    /// Every shape referenced by a returned life-line receives the identifier of that line.
    /// A shape held by a line keeps the identifier of that line; a shape held by several
    /// lines (the merged shape of a touch) keeps the identifier of the line created last.
    ///
    pub fn track(&self, frames: &[Vec<S>]) -> Result<Vec<LifeLine>> {
        let res = TrackingSession::new(self, frames).run();
        if self.cancellation.is_cancelled() {
            debug!("Cancellation is re-armed after the session");
            self.cancellation.reset();
        }
        res
    }
}

/// State of one `track` call
///
struct TrackingSession<'a, S> {
    tracker: &'a ShapeTracker<S>,
    frames: &'a [Vec<S>],
    boundaries: BoundaryCache,
}

impl<'a, S> TrackingSession<'a, S>
where
    S: TrackedShape,
{
    fn new(tracker: &'a ShapeTracker<S>, frames: &'a [Vec<S>]) -> Self {
        Self {
            tracker,
            frames,
            boundaries: BoundaryCache::default(),
        }
    }

    fn run(mut self) -> Result<Vec<LifeLine>> {
        let options = &self.tracker.options;
        let frame_sizes = self.frames.iter().map(Vec::len).collect::<Vec<_>>();
        info!(
            "Tracking session started: {} frames, {} shapes",
            frame_sizes.len(),
            frame_sizes.iter().sum::<usize>()
        );

        self.boundaries = build_boundary_cache(
            &self.tracker.pool,
            self.frames,
            self.tracker.provider.as_ref(),
        );

        let mut map = build_matching_map(
            &self.tracker.pool,
            &self.boundaries,
            options.intersection,
            self.tracker.shards,
            self.tracker.progress.as_ref(),
            &self.tracker.cancellation,
        )?;

        let mut store = LifeLineStore::default();
        EventClassifier::new(
            &map,
            frame_sizes,
            options.intersect_tolerance,
            options.consistency,
        )
        .classify(&mut store)?;
        map.clear();

        if options.reconcile_touches {
            let boundaries = &self.boundaries;
            let method = options.intersection;
            let touches = Reconciler::new(|a: ShapeRef, b: ShapeRef| {
                optional_overlap_score(
                    boundaries[a.frame][a.index].as_ref(),
                    boundaries[b.frame][b.index].as_ref(),
                    method,
                )
            })
            .reconcile(&mut store);
            debug!("{} touches reconciled", touches);
        }

        let lines = store.finalize();
        self.assign_identifiers(&lines);

        info!("{}", TrackingSummary::from_lines(&lines));
        Ok(lines)
    }

    /// Every referenced shape gets the identifier first, then the shapes a line holds are
    /// written once more so they keep the identifier of their own line.
    ///
    fn assign_identifiers(&self, lines: &[LifeLine]) {
        let assign = |shape: ShapeRef, identifier: u64| {
            self.frames[shape.frame][shape.index].assign_identifier(identifier)
        };
        for line in lines {
            for shape in line.events().values().flat_map(TemporalEvent::shapes) {
                assign(shape, line.identifier());
            }
        }
        for line in lines {
            for time in line.events().keys() {
                if let Some(shape) = line.shape_at(*time) {
                    assign(shape, line.identifier());
                }
            }
        }
    }
}

/// Event statistics of a finished session
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingSummary {
    pub lines: usize,
    pub longest: usize,
    pub events: BTreeMap<EventKind, usize>,
}

impl TrackingSummary {
    pub fn from_lines(lines: &[LifeLine]) -> Self {
        let mut events = BTreeMap::new();
        for kind in lines.iter().flat_map(|l| l.kinds()) {
            *events.entry(kind).or_insert(0) += 1;
        }
        Self {
            lines: lines.len(),
            longest: lines.iter().map(LifeLine::length).max().unwrap_or(0),
            events,
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for TrackingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tracking session finished: {} life-lines, longest {}",
            self.lines, self.longest
        )?;
        for (kind, count) in &self.events {
            write!(f, ", {} {}", kind, count)?;
        }
        Ok(())
    }
}
