//! Rendering: the walk loop, its canvas and the PNG output

pub mod canvas;
pub mod geometry;
pub mod paint;
pub mod raster;

use base64::Engine as Base64Engine;
use log::{debug, trace};
use sha2::{Digest, Sha256};

use crate::walk::{self, AngleSource};
use crate::{RenderParameters, Result, Viewport, WalkConfig};
use canvas::Canvas;
use geometry::Point;

/// Most trace entries reserved up front; longer walks grow the trace.
const TRACE_RESERVE_LIMIT: usize = 1 << 16;

/// An encoded walk image
#[derive(Debug, Clone)]
pub struct WalkImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl WalkImage {
    /// Standard (padded) base64 of the PNG bytes, as sent to hosts.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png_data)
    }

    /// Hex SHA-256 of the PNG bytes; stable for seeded walks.
    pub fn digest_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

/// A rendered walk together with the positions it visited
#[derive(Debug, Clone)]
pub struct WalkOutput {
    pub image: WalkImage,
    /// Start position followed by the position after every step
    pub trace: Vec<Point>,
}

/// Entries to reserve for a walk of `num_steps`. Callers of [`paint_walk`]
/// may skip validation, so this never overflows and is capped.
fn trace_capacity(num_steps: u64) -> usize {
    usize::try_from(num_steps).map_or(TRACE_RESERVE_LIMIT, |n| {
        n.saturating_add(1).min(TRACE_RESERVE_LIMIT)
    })
}

/// Record the full walk onto a new canvas without encoding it.
///
/// Draws the start marker, then for every step a segment from the previous
/// position and a circle at the new one. Returns the canvas and the trace.
pub fn paint_walk<S>(
    viewport: Viewport,
    step_length: f64,
    num_steps: u64,
    config: &WalkConfig,
    source: &mut S,
) -> (Canvas, Vec<Point>)
where
    S: AngleSource + ?Sized,
{
    let marker = config.marker_color.to_rgba8();
    let path = config.path_color.to_rgba8();

    let mut canvas = Canvas::new(viewport);
    canvas.clear(config.background.to_rgba8());

    let mut current = viewport.center();
    let mut trace = Vec::with_capacity(trace_capacity(num_steps));
    trace.push(current);
    canvas.fill_circle(current, config.marker_radius, marker);

    for i in 0..num_steps {
        let step = walk::take_step(step_length, source);
        let old = current;
        current += step;

        canvas.draw_line(old, current, config.line_width, path);
        canvas.fill_circle(current, config.marker_radius, path);
        trace.push(current);

        if (i + 1) % 1000 == 0 {
            trace!("walk step {}/{} at ({:.1}, {:.1})", i + 1, num_steps, current.x, current.y);
        }
    }

    (canvas, trace)
}

/// Validate `params`, walk with `source` and encode the result.
///
/// Nothing is allocated when validation fails, and no image is returned
/// when encoding fails.
pub fn render_walk_with<S>(
    params: &RenderParameters,
    config: &WalkConfig,
    source: &mut S,
) -> Result<WalkOutput>
where
    S: AngleSource + ?Sized,
{
    let viewport = params.validate(config)?;
    // validate() guarantees num_steps >= 0
    let num_steps = params.num_steps as u64;
    debug!(
        "rendering walk: step_length={} steps={} canvas={}x{}",
        params.step_length, num_steps, viewport.width, viewport.height
    );

    let (canvas, trace) = paint_walk(viewport, params.step_length, num_steps, config, source);
    let png_data = canvas.encode_png()?;
    debug!("encoded walk: {} bytes", png_data.len());

    Ok(WalkOutput {
        image: WalkImage {
            width: viewport.width,
            height: viewport.height,
            png_data,
        },
        trace,
    })
}

/// Render a walk using the randomness configured in `config`.
pub fn render_walk(params: &RenderParameters, config: &WalkConfig) -> Result<WalkImage> {
    let mut source = walk::source_for(config);
    render_walk_with(params, config, source.as_mut()).map(|out| out.image)
}
