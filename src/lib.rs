//! Walk Renderer
//!
//! Renders a two dimensional random walk to a PNG image. The walk starts at
//! the center of the canvas and takes a fixed number of equal-length steps in
//! uniformly random directions. Each step is drawn as a line segment followed
//! by a marker circle.
//!
//! # Features
//!
//! - **Host callable**: `walk` is registered by name and answers with a
//!   structured `{success, image}` or `{error}` value (see [`host`])
//! - **Pluggable randomness**: any [`walk::AngleSource`] drives the walk, so
//!   seeded and fixed sequences give reproducible images
//! - **WebAssembly** (feature `wasm`): installs `walk` on the JS global object
//!
//! # Example
//!
//! ```no_run
//! use walkrender::{RenderParameters, WalkConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = RenderParameters {
//!     step_length: 10.0,
//!     num_steps: 5,
//!     width: 200,
//!     height: 200,
//! };
//!
//! let image = walkrender::render_walk(&params, &WalkConfig::default())?;
//! std::fs::write("walk.png", &image.png_data)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod host;
pub mod rendering;
pub mod walk;

// Async-friendly render service (dedicated worker thread)
#[cfg(not(target_arch = "wasm32"))]
pub mod async_api;

// Browser binding: installs `walk` on the JS global object
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use async_api::WalkService;
pub use host::WalkResponse;
pub use rendering::{render_walk, render_walk_with, WalkImage, WalkOutput};

/// An RGB color given as fractions in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    /// Start marker blue
    pub const MARKER: Rgb = Rgb::new(0.259, 0.522, 0.957);
    /// Path green used for segments and step markers
    pub const PATH: Rgb = Rgb::new(0.204, 0.659, 0.325);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Opaque 8-bit RGBA, each channel clamped and rounded to nearest.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

/// Configuration for rendering walks
///
/// The defaults reproduce the reference look: white background, a blue start
/// marker, green path, 5px markers and 1px lines. `seed` is `None` by default
/// so every walk is different; set it for reproducible images.
///
/// # Examples
///
/// ```
/// let cfg = walkrender::WalkConfig::default();
/// assert_eq!(cfg.marker_radius, 5.0);
/// assert!(cfg.seed.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Canvas fill before anything is drawn
    pub background: Rgb,
    /// Color of the circle at the start position
    pub marker_color: Rgb,
    /// Color of every segment and every step circle
    pub path_color: Rgb,
    /// Radius of every circle in pixels
    pub marker_radius: f64,
    /// Stroke width of segments in pixels
    pub line_width: f64,
    /// Largest accepted `width * height`
    pub max_pixels: u64,
    /// Largest accepted step count
    pub max_steps: u64,
    /// Seed for reproducible walks (None => OS-seeded thread RNG)
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            marker_color: Rgb::MARKER,
            path_color: Rgb::PATH,
            marker_radius: 5.0,
            line_width: 1.0,
            max_pixels: 4096 * 4096,
            max_steps: 1_000_000,
            seed: None,
        }
    }
}

/// Canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Start position of every walk. Integer division truncates, so odd
    /// sizes round the center down (201 => 100).
    pub fn center(&self) -> rendering::geometry::Point {
        rendering::geometry::Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The four host-supplied parameters of a walk, as received
///
/// Values are kept signed so out-of-range input can be reported instead of
/// silently wrapping. Use [`RenderParameters::validate`] before rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    pub step_length: f64,
    pub num_steps: i64,
    pub width: i64,
    pub height: i64,
}

impl RenderParameters {
    /// Check the parameters against `config` and return the canvas size.
    ///
    /// Rejects non-positive dimensions, negative step counts, negative or
    /// non-finite step lengths, and anything above the config limits.
    pub fn validate(&self, config: &WalkConfig) -> Result<Viewport> {
        if !self.step_length.is_finite() {
            return Err(Error::Validation(format!(
                "stepLength must be finite, got {}",
                self.step_length
            )));
        }
        if self.step_length < 0.0 {
            return Err(Error::Validation(format!(
                "stepLength must not be negative, got {}",
                self.step_length
            )));
        }
        if self.num_steps < 0 {
            return Err(Error::Validation(format!(
                "numSteps must not be negative, got {}",
                self.num_steps
            )));
        }
        if self.num_steps as u64 > config.max_steps {
            return Err(Error::Validation(format!(
                "numSteps {} exceeds the limit of {}",
                self.num_steps, config.max_steps
            )));
        }
        let width = positive_dimension("width", self.width)?;
        let height = positive_dimension("height", self.height)?;
        let viewport = Viewport { width, height };
        if viewport.pixel_count() > config.max_pixels {
            return Err(Error::Validation(format!(
                "canvas {}x{} exceeds the limit of {} pixels",
                width, height, config.max_pixels
            )));
        }
        Ok(viewport)
    }
}

fn positive_dimension(name: &str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(Error::Validation(format!("{name} must be positive, got {value}")));
    }
    u32::try_from(value).map_err(|_| Error::Validation(format!("{name} is too large: {value}")))
}
