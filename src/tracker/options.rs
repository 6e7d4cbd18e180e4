use crate::geometry::IntersectionMethod;
use crate::Errors;
use anyhow::Result;

/// Default minimal overlap score for two shapes of consecutive frames to match
pub const DEFAULT_INTERSECT_TOLERANCE: f64 = 0.1;

/// What the classifier does with a predecessor whose life-line cannot be found
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsistencyMode {
    /// The association is dropped with a warning.
    #[default]
    Tolerant,
    /// Tracking fails with [`Errors::TrackingInconsistency`].
    Strict,
}

#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Scores strictly above the tolerance are matches
    pub intersect_tolerance: f64,
    pub consistency: ConsistencyMode,
    pub intersection: IntersectionMethod,
    /// When `false` fusions and splits are reported as classified, without touch detection
    pub reconcile_touches: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            intersect_tolerance: DEFAULT_INTERSECT_TOLERANCE,
            consistency: ConsistencyMode::default(),
            intersection: IntersectionMethod::default(),
            reconcile_touches: true,
        }
    }
}

impl TrackerOptions {
    pub fn new(intersect_tolerance: f64) -> Self {
        Self {
            intersect_tolerance,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.intersect_tolerance) {
            return Err(Errors::InvalidTolerance(self.intersect_tolerance).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tracker::options::{ConsistencyMode, TrackerOptions, DEFAULT_INTERSECT_TOLERANCE};
    use crate::Errors;

    #[test]
    fn defaults() {
        let opts = TrackerOptions::default();
        assert_eq!(opts.intersect_tolerance, DEFAULT_INTERSECT_TOLERANCE);
        assert_eq!(opts.consistency, ConsistencyMode::Tolerant);
        assert!(opts.reconcile_touches);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn tolerance_bounds() {
        assert!(TrackerOptions::new(0.0).validate().is_ok());
        for bad in [1.0, -0.1, f64::NAN] {
            let err = TrackerOptions::new(bad).validate().unwrap_err();
            assert!(matches!(
                err.downcast_ref::<Errors>(),
                Some(Errors::InvalidTolerance(_))
            ));
        }
    }
}
