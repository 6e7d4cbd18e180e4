use crate::matching::progress::{Cancellation, NoopProgress, ProgressNotifier};
use crate::shape::BoundaryProvider;
use crate::tracker::options::TrackerOptions;
use crate::tracker::ShapeTracker;
use crate::Errors;
use anyhow::Result;
use log::debug;

/// Builder for [`ShapeTracker`]
///
pub struct ShapeTrackerBuilder<S> {
    shards: usize,
    provider: Option<Box<dyn BoundaryProvider<S>>>,
    options: Option<TrackerOptions>,
    progress: Option<Box<dyn ProgressNotifier>>,
    cancellation: Option<Cancellation>,
}

/// Default builder
/// shards count is set to number cpu cores (threads)
///
impl<S> Default for ShapeTrackerBuilder<S> {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl<S> ShapeTrackerBuilder<S> {
    /// Creates a new builder
    ///
    /// # Parameters
    /// * `shards` - number of matching map shards and worker threads of the matching phase
    ///
    pub fn new(shards: usize) -> Self {
        Self {
            shards: shards.max(1),
            provider: None,
            options: None,
            progress: None,
            cancellation: None,
        }
    }

    /// Sets the boundary provider, the only mandatory part of the tracker
    ///
    pub fn boundary_provider<P>(mut self, provider: P) -> Self
    where
        P: BoundaryProvider<S> + 'static,
    {
        assert!(
            self.provider.is_none(),
            "The method `boundary_provider` must be called once."
        );
        self.provider = Some(Box::new(provider));
        self
    }

    /// Sets tracking options, [`TrackerOptions::default`] is used otherwise
    ///
    pub fn options(mut self, options: TrackerOptions) -> Self {
        assert!(
            self.options.is_none(),
            "The method `options` must be called once."
        );
        self.options = Some(options);
        self
    }

    /// Sets the progress sink of the matching phase
    ///
    pub fn progress<N>(mut self, progress: N) -> Self
    where
        N: ProgressNotifier + 'static,
    {
        assert!(
            self.progress.is_none(),
            "The method `progress` must be called once."
        );
        self.progress = Some(Box::new(progress));
        self
    }

    /// Shares the cancellation handle with the caller
    ///
    pub fn cancellation(mut self, cancellation: Cancellation) -> Self {
        assert!(
            self.cancellation.is_none(),
            "The method `cancellation` must be called once."
        );
        self.cancellation = Some(cancellation);
        self
    }

    /// Builds the tracker
    ///
    /// Fails with [`Errors::MissingBoundaryProvider`] when no provider is set and with
    /// [`Errors::InvalidTolerance`] when the options are invalid.
    ///
    pub fn build(self) -> Result<ShapeTracker<S>> {
        let provider = self.provider.ok_or(Errors::MissingBoundaryProvider)?;
        let options = self.options.unwrap_or_default();
        options.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.shards)
            .thread_name(|i| format!("lifelines-matching-{}", i))
            .build()?;
        debug!(
            "Shape tracker is built: {} shards, options {:?}",
            self.shards, options
        );

        Ok(ShapeTracker {
            provider,
            options,
            progress: self.progress.unwrap_or_else(|| Box::new(NoopProgress)),
            cancellation: self.cancellation.unwrap_or_default(),
            pool,
            shards: self.shards,
        })
    }
}
