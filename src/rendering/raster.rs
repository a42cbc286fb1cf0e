/// Software rasterizer for the walk's paint commands, plus PNG encoding
///
/// Coverage is estimated with a 4x4 grid of samples per pixel and blended
/// source-over onto an opaque RGBA buffer.

use super::geometry::{PixelRect, Point};
use super::paint::{PaintCommand, Rgba};
use crate::Result;

const SAMPLES_PER_AXIS: u32 = 4;
const SAMPLE_COUNT: u32 = SAMPLES_PER_AXIS * SAMPLES_PER_AXIS;

/// An 8-bit RGBA pixel buffer, row-major, top-left origin
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y), or None when outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn fill(&mut self, rgba: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Source-over blend of `rgba` at `coverage` in [0, 1].
    fn blend(&mut self, x: u32, y: u32, rgba: Rgba, coverage: f64) {
        let a = coverage * rgba[3] as f64 / 255.0;
        if a <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        if a >= 1.0 {
            self.data[i..i + 4].copy_from_slice(&rgba);
            return;
        }
        for c in 0..3 {
            let dst = self.data[i + c] as f64;
            self.data[i + c] = (rgba[c] as f64 * a + dst * (1.0 - a)).round() as u8;
        }
        let dst_a = self.data[i + 3] as f64 / 255.0;
        self.data[i + 3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
    }

    /// Blend `rgba` into every pixel of `rect` weighted by the fraction of
    /// samples for which `inside` holds. Returns the number of pixels sampled.
    fn cover<F>(&mut self, rect: PixelRect, rgba: Rgba, inside: F) -> u64
    where
        F: Fn(Point) -> bool,
    {
        let step = 1.0 / SAMPLES_PER_AXIS as f64;
        let sampled = (rect.x1 - rect.x0) as u64 * (rect.y1 - rect.y0) as u64;
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let mut hits = 0u32;
                for sy in 0..SAMPLES_PER_AXIS {
                    for sx in 0..SAMPLES_PER_AXIS {
                        let p = Point::new(
                            x as f64 + (sx as f64 + 0.5) * step,
                            y as f64 + (sy as f64 + 0.5) * step,
                        );
                        if inside(p) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    self.blend(x, y, rgba, hits as f64 / SAMPLE_COUNT as f64);
                }
            }
        }
        sampled
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, rgba: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r = Point::new(radius, radius);
        let Some(rect) = PixelRect::covering(center - r, center + r, self.width, self.height) else {
            return;
        };
        let r2 = radius * radius;
        self.cover(rect, rgba, |p| {
            let d = p - center;
            d.dot(d) <= r2
        });
    }

    /// Stroke `from`..`to` with butt caps. A zero-length segment paints nothing.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f64, rgba: Rgba) {
        self.stroke_line_sampled(from, to, width, rgba);
    }

    /// Stroke a segment and return how many pixels were sampled.
    ///
    /// The stroke is the rectangle `from..to` widened by `width / 2` on each
    /// side. Each pixel row only samples the x-span where that rectangle
    /// crosses the row, padded by a pixel, so the work grows with the
    /// segment's length and not with its bounding box.
    fn stroke_line_sampled(&mut self, from: Point, to: Point, width: f64, rgba: Rgba) -> u64 {
        let dir = to - from;
        let len2 = dir.dot(dir);
        if len2 == 0.0 || width <= 0.0 {
            return 0;
        }
        let half = width / 2.0;
        let pad = Point::new(half, half);
        let min = Point::new(from.x.min(to.x), from.y.min(to.y)) - pad;
        let max = Point::new(from.x.max(to.x), from.y.max(to.y)) + pad;
        let Some(rect) = PixelRect::covering(min, max, self.width, self.height) else {
            return 0;
        };
        let len = len2.sqrt();
        let normal = Point::new(-dir.y / len * half, dir.x / len * half);
        let corners = [from + normal, to + normal, to - normal, from - normal];
        let inside = |p: Point| {
            let rel = p - from;
            let t = rel.dot(dir) / len2;
            if !(0.0..=1.0).contains(&t) {
                return false;
            }
            // perpendicular distance via the 2D cross product
            (rel.x * dir.y - rel.y * dir.x).abs() / len <= half
        };

        let clip_x = |v: f64| v.clamp(rect.x0 as f64, rect.x1 as f64) as u32;
        let mut sampled = 0;
        for y in rect.y0..rect.y1 {
            let Some((lo, hi)) = row_span(&corners, y as f64, y as f64 + 1.0) else {
                continue;
            };
            let x0 = clip_x(lo.floor() - 1.0);
            let x1 = clip_x(hi.floor() + 2.0);
            if x0 >= x1 {
                continue;
            }
            let row = PixelRect {
                x0,
                y0: y,
                x1,
                y1: y + 1,
            };
            sampled += self.cover(row, rgba, &inside);
        }
        sampled
    }

    pub fn apply(&mut self, cmd: &PaintCommand) {
        match *cmd {
            PaintCommand::Clear { rgba } => self.fill(rgba),
            PaintCommand::Line { from, to, width, rgba } => self.stroke_line(from, to, width, rgba),
            PaintCommand::FillCircle { center, radius, rgba } => {
                self.fill_circle(center, radius, rgba)
            }
        }
    }

    /// Serialize as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
            writer.finish()?;
        }
        Ok(buf)
    }
}

/// Horizontal extent of the convex quad `corners` within the band
/// `y0..=y1`, or None when the quad misses the band.
fn row_span(corners: &[Point; 4], y0: f64, y1: f64) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for i in 0..corners.len() {
        let (mut a, mut b) = (corners[i], corners[(i + 1) % corners.len()]);
        if a.y > b.y {
            std::mem::swap(&mut a, &mut b);
        }
        if b.y < y0 || a.y > y1 {
            continue;
        }
        let (xa, xb) = if a.y == b.y {
            (a.x, b.x)
        } else {
            let x_at = |y: f64| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
            (x_at(a.y.max(y0)), x_at(b.y.min(y1)))
        };
        lo = lo.min(xa.min(xb));
        hi = hi.max(xa.max(xb));
    }
    (lo <= hi).then_some((lo, hi))
}

/// Replay `commands` onto a fresh transparent surface.
pub fn rasterize(width: u32, height: u32, commands: &[PaintCommand]) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height);
    for cmd in commands {
        pixmap.apply(cmd);
    }
    pixmap
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [255, 255, 255, 255];
    const BLUE: Rgba = [66, 133, 244, 255];

    #[test]
    fn circle_interior_is_solid_and_outside_untouched() {
        let mut p = Pixmap::new(20, 20);
        p.fill(WHITE);
        p.fill_circle(Point::new(10.0, 10.0), 5.0, BLUE);
        assert_eq!(p.pixel(10, 10), Some(BLUE));
        assert_eq!(p.pixel(7, 9), Some(BLUE));
        assert_eq!(p.pixel(0, 0), Some(WHITE));
        assert_eq!(p.pixel(16, 10), Some(WHITE));
    }

    #[test]
    fn circle_edge_is_antialiased() {
        let mut p = Pixmap::new(20, 20);
        p.fill(WHITE);
        p.fill_circle(Point::new(10.0, 10.0), 5.0, BLUE);
        // pixel (13,13) straddles the rim
        let edge = p.pixel(13, 13).unwrap();
        assert_ne!(edge, WHITE);
        assert_ne!(edge, BLUE);
        assert_eq!(edge[3], 255);
    }

    #[test]
    fn horizontal_line_covers_its_row() {
        let mut p = Pixmap::new(20, 5);
        p.fill(WHITE);
        p.stroke_line(Point::new(2.0, 2.5), Point::new(18.0, 2.5), 1.0, BLUE);
        assert_eq!(p.pixel(10, 2), Some(BLUE));
        assert_eq!(p.pixel(10, 1), Some(WHITE));
        assert_eq!(p.pixel(10, 3), Some(WHITE));
        // butt caps: nothing before the start point
        assert_eq!(p.pixel(1, 2), Some(WHITE));
    }

    /// Stroke by sampling the whole bounding box of the segment.
    fn stroke_every_pixel(p: &mut Pixmap, from: Point, to: Point, width: f64, rgba: Rgba) {
        let dir = to - from;
        let len2 = dir.dot(dir);
        let half = width / 2.0;
        let pad = Point::new(half, half);
        let min = Point::new(from.x.min(to.x), from.y.min(to.y)) - pad;
        let max = Point::new(from.x.max(to.x), from.y.max(to.y)) + pad;
        let Some(rect) = PixelRect::covering(min, max, p.width(), p.height()) else {
            return;
        };
        let len = len2.sqrt();
        p.cover(rect, rgba, |q| {
            let rel = q - from;
            let t = rel.dot(dir) / len2;
            (0.0..=1.0).contains(&t) && (rel.x * dir.y - rel.y * dir.x).abs() / len <= half
        });
    }

    #[test]
    fn row_spans_match_full_box_sampling() {
        let lines = [
            (Point::new(3.0, 4.0), Point::new(35.0, 25.0), 1.0),
            (Point::new(35.5, 2.25), Point::new(4.0, 27.0), 1.0),
            (Point::new(-6.0, 10.0), Point::new(44.0, 12.5), 1.0),
            (Point::new(20.0, -5.0), Point::new(20.3, 40.0), 1.0),
            (Point::new(5.0, 15.0), Point::new(30.0, 15.0), 1.0),
            (Point::new(12.7, 3.1), Point::new(13.9, 28.4), 2.5),
            (Point::new(30.0, 20.0), Point::new(31.0, 21.0), 0.3),
        ];
        for (from, to, width) in lines {
            let mut fast = Pixmap::new(40, 30);
            fast.fill(WHITE);
            let mut slow = fast.clone();
            fast.stroke_line(from, to, width, BLUE);
            stroke_every_pixel(&mut slow, from, to, width, BLUE);
            assert_eq!(fast, slow, "{from:?} -> {to:?} width {width}");
        }
    }

    #[test]
    fn long_diagonal_samples_pixels_along_its_length() {
        let mut p = Pixmap::new(2000, 2000);
        p.fill(WHITE);
        let run = 1700.0 / std::f64::consts::SQRT_2;
        let from = Point::new(100.0, 100.0);
        let sampled = p.stroke_line_sampled(from, from + Point::new(run, run), 1.0, BLUE);
        // the bounding box alone holds ~1.45M pixels
        assert!(sampled > 1202, "{sampled}");
        assert!(sampled < 10 * 1700, "{sampled}");
        assert_ne!(p.pixel(700, 700), Some(WHITE));
        assert_eq!(p.pixel(700, 710), Some(WHITE));
    }

    #[test]
    fn zero_length_line_paints_nothing() {
        let mut p = Pixmap::new(8, 8);
        p.fill(WHITE);
        p.stroke_line(Point::new(4.0, 4.0), Point::new(4.0, 4.0), 1.0, BLUE);
        assert!(p.data().chunks(4).all(|px| px == WHITE));
    }

    #[test]
    fn offscreen_shapes_are_clipped() {
        let mut p = Pixmap::new(8, 8);
        p.fill(WHITE);
        p.fill_circle(Point::new(-50.0, -50.0), 5.0, BLUE);
        p.stroke_line(Point::new(-10.0, 20.0), Point::new(30.0, 20.0), 1.0, BLUE);
        assert!(p.data().chunks(4).all(|px| px == WHITE));
    }

    #[test]
    fn rasterize_replays_in_order() {
        let cmds = vec![
            PaintCommand::Clear { rgba: WHITE },
            PaintCommand::FillCircle {
                center: Point::new(4.0, 4.0),
                radius: 3.0,
                rgba: BLUE,
            },
            PaintCommand::Clear { rgba: WHITE },
        ];
        let p = rasterize(8, 8, &cmds);
        assert_eq!(p.pixel(4, 4), Some(WHITE));
    }

    #[test]
    fn encode_png_has_signature() {
        let mut p = Pixmap::new(3, 2);
        p.fill(WHITE);
        let bytes = p.encode_png().unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
