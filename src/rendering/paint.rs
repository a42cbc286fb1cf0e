/// Paint commands recorded by a canvas, replayed in insertion order

use super::geometry::Point;

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole surface
    Clear { rgba: Rgba },
    /// Stroke a straight segment with butt caps
    Line {
        from: Point,
        to: Point,
        width: f64,
        rgba: Rgba,
    },
    /// Fill a disc
    FillCircle {
        center: Point,
        radius: f64,
        rgba: Rgba,
    },
}

impl PaintCommand {
    pub fn is_line(&self) -> bool {
        matches!(self, PaintCommand::Line { .. })
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, PaintCommand::FillCircle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_command_kinds() {
        let cmd = PaintCommand::FillCircle {
            center: Point::new(100.0, 100.0),
            radius: 5.0,
            rgba: [66, 133, 244, 255],
        };
        assert!(cmd.is_circle());
        assert!(!cmd.is_line());
        match cmd {
            PaintCommand::FillCircle { radius, .. } => assert_eq!(radius, 5.0),
            _ => panic!("unexpected"),
        }
    }
}
