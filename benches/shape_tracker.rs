#![feature(test)]

extern crate test;

use lifelines::examples::drifting_frames;
use lifelines::prelude::{IntersectionMethod, OutlineBoundary, ShapeTrackerBuilder, TrackerOptions};
use std::time::Instant;
use test::Bencher;

#[bench]
fn track_00010x050_boolean(b: &mut Bencher) {
    bench_track(10, 50, IntersectionMethod::Boolean, b);
}

#[bench]
fn track_00100x050_boolean(b: &mut Bencher) {
    bench_track(100, 50, IntersectionMethod::Boolean, b);
}

#[bench]
fn track_00010x050_convex_clip(b: &mut Bencher) {
    bench_track(10, 50, IntersectionMethod::ConvexClip, b);
}

#[bench]
fn track_00100x050_convex_clip(b: &mut Bencher) {
    bench_track(100, 50, IntersectionMethod::ConvexClip, b);
}

fn bench_track(objects: usize, frames: usize, intersection: IntersectionMethod, b: &mut Bencher) {
    let _ = env_logger::try_init();
    let ncores = match objects {
        10 => 1,
        _ => num_cpus::get(),
    };

    let tracker = ShapeTrackerBuilder::new(ncores)
        .boundary_provider(OutlineBoundary::default())
        .options(TrackerOptions {
            intersection,
            ..Default::default()
        })
        .build()
        .unwrap();

    let shapes = drifting_frames(objects, frames, 15.0);

    b.iter(|| {
        let tm = Instant::now();
        let lines = tracker.track(&shapes).unwrap();
        let elapsed = tm.elapsed();
        eprintln!("Tracking time: {:?}, life-lines: {}", elapsed, lines.len());
    });
}
