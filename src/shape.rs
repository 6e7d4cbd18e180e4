use geo::{Polygon, Simplify};
use std::fmt;

/// Handle of a shape: the frame (time index) and the position of the shape inside the frame.
///
/// Two handles are equal only when they name the very same detected shape, so the handle is
/// used everywhere shapes are grouped or compared.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeRef {
    pub frame: usize,
    pub index: usize,
}

impl ShapeRef {
    pub fn new(frame: usize, index: usize) -> Self {
        Self { frame, index }
    }
}

impl fmt::Display for ShapeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.frame, self.index)
    }
}

/// The shape produced by an upstream detector.
///
/// The tracker never owns shapes; it only writes the identifier of the life-line
/// the shape belongs to, so implementors are expected to use interior mutability.
///
pub trait TrackedShape: Send + Sync {
    fn assign_identifier(&self, identifier: u64);
}

/// Computes the closed boundary polygon of a shape.
///
/// `None` means the shape has no usable boundary; such a shape never matches anything.
///
pub trait BoundaryProvider<S>: Send + Sync {
    fn boundary(&self, shape: &S) -> Option<Polygon<f64>>;
}

impl<S, F> BoundaryProvider<S> for F
where
    F: Fn(&S) -> Option<Polygon<f64>> + Send + Sync,
{
    fn boundary(&self, shape: &S) -> Option<Polygon<f64>> {
        self(shape)
    }
}

/// Shapes that carry their own outline polygon
///
pub trait HasOutline {
    fn outline(&self) -> Option<&Polygon<f64>>;
}

/// Boundary provider for [`HasOutline`] shapes
///
/// # Parameters
/// * `simplify_epsilon` - when set, the outline is simplified with Ramer–Douglas–Peucker
///   before scoring; pixel-traced outlines carry many collinear vertices that only slow the
///   intersection down.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineBoundary {
    pub simplify_epsilon: Option<f64>,
}

impl OutlineBoundary {
    pub fn new(simplify_epsilon: Option<f64>) -> Self {
        Self { simplify_epsilon }
    }
}

impl<S> BoundaryProvider<S> for OutlineBoundary
where
    S: HasOutline,
{
    fn boundary(&self, shape: &S) -> Option<Polygon<f64>> {
        let outline = shape.outline()?;
        match self.simplify_epsilon {
            Some(eps) if eps > 0.0 => Some(outline.simplify(&eps)),
            _ => Some(outline.clone()),
        }
    }
}
