//! Step generation for the random walk
//!
//! A step has a fixed length and a direction drawn from whole degrees in the
//! inclusive range `0..=360`. Both 0 and 360 are possible draws; they point
//! the same way, so that direction is twice as likely as any other. This
//! matches the reference renderer's output distribution.

pub mod source;

pub use source::{AngleSource, FixedAngles, SeededAngles, ThreadAngles};

use crate::rendering::geometry::Point;
use crate::WalkConfig;

/// Largest angle (inclusive) an [`AngleSource`] may return.
pub const MAX_DEGREE: u32 = 360;

pub fn degrees_to_radians(degrees: u32) -> f64 {
    degrees as f64 * std::f64::consts::PI / 180.0
}

/// Displacement of one step of `step_length` in the direction `degrees`.
pub fn step_for(step_length: f64, degrees: u32) -> Point {
    let radians = degrees_to_radians(degrees);
    Point::new(step_length * radians.cos(), step_length * radians.sin())
}

/// Draw a direction from `source` and return the displacement (not a position).
pub fn take_step<S>(step_length: f64, source: &mut S) -> Point
where
    S: AngleSource + ?Sized,
{
    step_for(step_length, source.next_degree())
}

/// The angle source `config` asks for: seeded when `config.seed` is set,
/// otherwise the thread-local RNG.
pub fn source_for(config: &WalkConfig) -> Box<dyn AngleSource> {
    match config.seed {
        Some(seed) => Box::new(SeededAngles::new(seed)),
        None => Box::new(ThreadAngles),
    }
}
