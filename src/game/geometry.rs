use bevy::math::DVec2;

/// Unit vector in the direction of `v`, or zero when `v` has no length.
/// Entities sitting exactly on their target freeze instead of producing NaN.
pub fn normalize(v: DVec2) -> DVec2 {
    v.normalize_or_zero()
}

/// Heading vector for a rotation. Rotation 0 faces screen-up (negative y).
pub fn heading(rotation: f64) -> DVec2 {
    DVec2::new(rotation.sin(), -rotation.cos())
}

/// Inverse of [`heading`]: the rotation that faces along `dir`.
pub fn rotation_of(dir: DVec2) -> f64 {
    dir.x.atan2(-dir.y)
}

/// Axis-aligned rectangle in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive overlap test: touching edges count as a hit.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: DVec2) -> DVec2 {
        p.clamp(self.min, self.max)
    }

    // Cohen–Sutherland region code.
    fn outcode(&self, p: DVec2) -> u8 {
        let mut code = INSIDE;
        if p.x < self.min.x {
            code |= LEFT;
        } else if p.x > self.max.x {
            code |= RIGHT;
        }
        if p.y < self.min.y {
            code |= TOP;
        } else if p.y > self.max.y {
            code |= BOTTOM;
        }
        code
    }

    /// Segment/rectangle intersection by Cohen–Sutherland clipping.
    pub fn intersects_segment(&self, a: DVec2, b: DVec2) -> bool {
        let (mut a, mut b) = (a, b);
        let mut code_a = self.outcode(a);
        let mut code_b = self.outcode(b);

        loop {
            if code_a | code_b == INSIDE {
                return true;
            }
            if code_a & code_b != 0 {
                return false;
            }

            let out = if code_a != INSIDE { code_a } else { code_b };
            let d = b - a;
            let p = if out & BOTTOM != 0 {
                DVec2::new(a.x + d.x * (self.max.y - a.y) / d.y, self.max.y)
            } else if out & TOP != 0 {
                DVec2::new(a.x + d.x * (self.min.y - a.y) / d.y, self.min.y)
            } else if out & RIGHT != 0 {
                DVec2::new(self.max.x, a.y + d.y * (self.max.x - a.x) / d.x)
            } else {
                DVec2::new(self.min.x, a.y + d.y * (self.min.x - a.x) / d.x)
            };

            if out == code_a {
                a = p;
                code_a = self.outcode(a);
            } else {
                b = p;
                code_b = self.outcode(b);
            }
        }
    }

    /// Circle/rectangle test against the closest point of the rectangle.
    pub fn intersects_circle(&self, center: DVec2, radius: f64) -> bool {
        self.clamp(center).distance(center) <= radius
    }
}

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;
