/// A fixed-size draw surface that records paint commands
///
/// Drawing is deferred: commands are kept in insertion order and only
/// rasterized when the canvas is encoded. This keeps the drawn primitives
/// inspectable for tests.

use super::geometry::Point;
use super::paint::{PaintCommand, Rgba};
use super::raster::{rasterize, Pixmap};
use crate::{Result, Viewport};

#[derive(Debug, Clone)]
pub struct Canvas {
    viewport: Viewport,
    commands: Vec<PaintCommand>,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn line_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_line()).count()
    }

    pub fn circle_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_circle()).count()
    }

    pub fn clear(&mut self, rgba: Rgba) {
        self.commands.push(PaintCommand::Clear { rgba });
    }

    pub fn draw_line(&mut self, from: Point, to: Point, width: f64, rgba: Rgba) {
        self.commands.push(PaintCommand::Line {
            from,
            to,
            width,
            rgba,
        });
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, rgba: Rgba) {
        self.commands.push(PaintCommand::FillCircle {
            center,
            radius,
            rgba,
        });
    }

    pub fn rasterize(&self) -> Pixmap {
        rasterize(self.viewport.width, self.viewport.height, &self.commands)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.rasterize().encode_png()
    }
}
