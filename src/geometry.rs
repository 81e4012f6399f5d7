//! Points and sizes in canvas pixels.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Size { width: side, height: side }
    }

    /// Top-left corner of a box of this size centered on `center`.
    pub fn top_left(self, center: Point) -> Point {
        Point::new(center.x - self.width / 2.0, center.y - self.height / 2.0)
    }
}
