use glam::IVec2;

/// An axis-aligned rectangle in screen pixels.
///
/// `right()` and `bottom()` are exclusive, so a rectangle at `y = 410` with height 60
/// has its bottom edge at 470 and touches (without overlapping) anything starting at 470.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> glam::UVec2 {
        glam::UVec2::new(self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// The rectangle grown by `margin` pixels on every side.
    pub fn inflated(&self, margin: i32) -> Self {
        let w = (self.w as i32 + 2 * margin).max(0) as u32;
        let h = (self.h as i32 + 2 * margin).max(0) as u32;
        Self::new(self.x - margin, self.y - margin, w, h)
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// True if the rectangles share any pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// The shared region of both rectangles, or `None` when they are disjoint or merely touch.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (left < right && top < bottom).then(|| Rect::new(left, top, (right - left) as u32, (bottom - top) as u32))
    }

    /// True if `other` lies entirely within this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left() && other.right() <= self.right() && other.top() >= self.top() && other.bottom() <= self.bottom()
    }
}
