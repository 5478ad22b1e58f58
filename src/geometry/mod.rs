//! Axis-aligned rectangles, per-pixel masks and the overlap predicate built on them.

pub mod mask;
pub mod rect;

pub use mask::Mask;
pub use rect::Rect;

/// A positioned mask: the rectangle an entity currently occupies together with its opaque pixels.
///
/// The mask is always the same size as the rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    pub rect: Rect,
    pub mask: &'a Mask,
}

impl<'a> Shape<'a> {
    pub fn new(x: i32, y: i32, mask: &'a Mask) -> Self {
        Self {
            rect: Rect::new(x, y, mask.width(), mask.height()),
            mask,
        }
    }
}

/// Returns true if the opaque pixels of `a` and `b` share at least one screen coordinate.
///
/// Disjoint bounding boxes are rejected before any mask lookup.
pub fn overlaps(a: &Shape<'_>, b: &Shape<'_>) -> bool {
    let Some(shared) = a.rect.intersection(&b.rect) else {
        return false;
    };

    let offset = b.rect.top_left() - a.rect.top_left();
    a.mask.overlaps_region(b.mask, offset, shared.translated(-a.rect.x, -a.rect.y))
}

/// Returns the first shape in `others` that overlaps `shape`, if any.
pub fn first_overlap<'a, 'b>(shape: &Shape<'_>, others: &'b [Shape<'a>]) -> Option<&'b Shape<'a>> {
    others.iter().find(|other| overlaps(shape, other))
}
