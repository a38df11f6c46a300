/// Axis-aligned face rectangle in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width × height, widened so large boxes cannot overflow.
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Top `ratio` of the box at full width. Height is floored.
    pub fn top_band(&self, ratio: f64) -> Region {
        let height = (self.height.max(0) as f64 * ratio).floor() as i32;
        Region {
            height,
            ..*self
        }
    }

    /// Returns the candidate with the largest area.
    ///
    /// Ties resolve to the earliest candidate; detector order plays no other
    /// role.
    pub fn largest(candidates: &[Region]) -> Option<Region> {
        candidates.iter().copied().fold(None, |best, r| match best {
            Some(b) if b.area() >= r.area() => Some(b),
            _ => Some(r),
        })
    }
}
