//! Immediate-mode 2D drawing surface used by the simulation.
//!
//! The simulation only ever issues three primitives: clear a rectangle, fill a
//! circle and stroke a line segment. [`DrawList`] records them so a frame can
//! be handed to the GPU renderer, moved across threads, or inspected in tests.

use glam::{Vec2, Vec4};

pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);

    /// Called once a tick has finished drawing.
    fn present(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear {
        origin: Vec2,
        size: Vec2,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Vec4,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Vec4,
    },
}

/// Recording surface. A clear covering the whole surface discards everything
/// recorded before it, so a list never holds more than one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Vec4)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Vec4)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Line {
                from, to, color, ..
            } => Some((from, to, color)),
            _ => None,
        })
    }

    pub fn is_blank(&self) -> bool {
        self.commands
            .iter()
            .all(|cmd| matches!(cmd, DrawCommand::Clear { .. }))
    }

    fn covers_surface(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        x <= 0.0 && y <= 0.0 && x + width >= self.width as f32 && y + height >= self.height as f32
    }
}

impl DrawSurface for DrawList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.covers_surface(x, y, width, height) {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_clear_drops_previous_frame() {
        let mut list = DrawList::new(100, 50);
        list.fill_circle(Vec2::new(10.0, 10.0), 2.0, Vec4::ONE);
        list.stroke_line(Vec2::ZERO, Vec2::ONE, 0.5, Vec4::ONE);
        list.clear_rect(0.0, 0.0, 100.0, 50.0);

        assert_eq!(list.commands().len(), 1);
        assert!(list.is_blank());
    }

    #[test]
    fn partial_clear_is_recorded_in_order() {
        let mut list = DrawList::new(100, 50);
        list.fill_circle(Vec2::new(10.0, 10.0), 2.0, Vec4::ONE);
        list.clear_rect(0.0, 0.0, 20.0, 20.0);

        assert_eq!(list.commands().len(), 2);
        assert_eq!(list.circles().count(), 1);
    }
}
