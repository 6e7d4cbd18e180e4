use crate::shape::{HasOutline, TrackedShape};
use geo::{polygon, Polygon};
use rand::distributions::Uniform;
use rand::prelude::ThreadRng;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Shape backed by an outline polygon, the identifier is kept in an atomic
///
#[derive(Debug)]
pub struct PolygonShape {
    outline: Option<Polygon<f64>>,
    identifier: AtomicI64,
}

impl PolygonShape {
    pub fn new(outline: Polygon<f64>) -> Self {
        Self {
            outline: Some(outline),
            identifier: AtomicI64::new(-1),
        }
    }

    /// Shape the detector failed to outline
    ///
    pub fn without_outline() -> Self {
        Self {
            outline: None,
            identifier: AtomicI64::new(-1),
        }
    }

    /// Axis-aligned rectangle with the lower-left corner at `(x, y)`
    ///
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(polygon![
            (x: x, y: y),
            (x: x + width, y: y),
            (x: x + width, y: y + height),
            (x: x, y: y + height),
        ])
    }

    /// Identifier of the life-line the shape belongs to, `None` until tracked
    ///
    pub fn identifier(&self) -> Option<u64> {
        match self.identifier.load(Ordering::SeqCst) {
            id if id < 0 => None,
            id => Some(id as u64),
        }
    }
}

impl Clone for PolygonShape {
    fn clone(&self) -> Self {
        Self {
            outline: self.outline.clone(),
            identifier: AtomicI64::new(self.identifier.load(Ordering::SeqCst)),
        }
    }
}

impl HasOutline for PolygonShape {
    fn outline(&self) -> Option<&Polygon<f64>> {
        self.outline.as_ref()
    }
}

impl TrackedShape for PolygonShape {
    fn assign_identifier(&self, identifier: u64) {
        self.identifier.store(identifier as i64, Ordering::SeqCst);
    }
}

/// Rectangle that drifts randomly from frame to frame
///
pub struct ShapeGen {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    gen: ThreadRng,
    dist_pos: Uniform<f64>,
    dist_box: Uniform<f64>,
}

impl ShapeGen {
    pub fn new(x: f64, y: f64, width: f64, height: f64, pos_drift: f64, box_drift: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            gen: rand::thread_rng(),
            dist_pos: Uniform::new(-pos_drift, pos_drift),
            dist_box: Uniform::new(-box_drift, box_drift),
        }
    }
}

impl Iterator for ShapeGen {
    type Item = PolygonShape;

    fn next(&mut self) -> Option<Self::Item> {
        self.x += self.gen.sample(self.dist_pos);
        self.y += self.gen.sample(self.dist_pos);

        self.width += self.gen.sample(self.dist_box);
        self.height += self.gen.sample(self.dist_box);

        if self.width < 1.0 {
            self.width = 1.0;
        }
        if self.height < 1.0 {
            self.height = 1.0;
        }

        Some(PolygonShape::rect(self.x, self.y, self.width, self.height))
    }
}

/// Frames of `objects` independently drifting rectangles laid out on a row
///
/// # Parameters
/// * `objects` - amount of rectangles in every frame
/// * `frames` - amount of frames
/// * `spacing` - distance between the initial positions of neighbour rectangles
///
pub fn drifting_frames(objects: usize, frames: usize, spacing: f64) -> Vec<Vec<PolygonShape>> {
    let mut gens = (0..objects)
        .map(|i| ShapeGen::new(i as f64 * spacing, 0.0, 10.0, 10.0, 0.5, 0.2))
        .collect::<Vec<_>>();
    (0..frames)
        .map(|_| {
            gens.iter_mut()
                .flat_map(|g| g.next())
                .collect::<Vec<_>>()
        })
        .collect()
}
