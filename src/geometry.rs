/// Rectangle maths shared by every entity.
///
/// World coordinates are pixels with the origin in the top-left corner and
/// `y` growing downwards.

use crate::error::GeometryError;

/// Axis-aligned bounding box, stored as top-left corner plus size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect of size `w`×`h` centred on `(cx, cy)`.
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Translate in place.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Overlap test. Rects that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Returns `(horizontal_ok, vertical_ok)` for a rect inside a
/// `width`×`height` screen.
pub fn within_bounds(rect: &Rect, width: f32, height: f32) -> (bool, bool) {
    let horizontal = !(rect.left() < 0.0 || width < rect.right());
    let vertical = !(rect.top() < 0.0 || height < rect.bottom());
    (horizontal, vertical)
}

/// Both axes inside the screen.
pub fn fully_inside(rect: &Rect, width: f32, height: f32) -> bool {
    within_bounds(rect, width, height) == (true, true)
}

/// Unit vector pointing from the centre of `origin` to the centre of `target`.
pub fn direction_vector(origin: &Rect, target: &Rect) -> Result<(f32, f32), GeometryError> {
    let (ox, oy) = origin.center();
    let (tx, ty) = target.center();
    let (dx, dy) = (tx - ox, ty - oy);
    let norm = dx.hypot(dy);
    if norm <= f32::EPSILON {
        return Err(GeometryError::ZeroLengthDirection { x: ox, y: oy });
    }
    Ok((dx / norm, dy / norm))
}
