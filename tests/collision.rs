use christmas_adventures::geometry::{self, Mask, Rect, Shape};
use glam::IVec2;
use speculoos::prelude::*;

mod common;

/// A 10x10 mask that is only opaque in its right half.
fn right_half() -> Mask {
    Mask::from_fn(10, 10, |x, _| x >= 5)
}

#[test]
fn test_solid_shapes_overlap() {
    let a = common::solid(10, 10);
    let b = common::solid(10, 10);
    assert!(geometry::overlaps(&Shape::new(0, 0, &a), &Shape::new(9, 9, &b)));
}

#[test]
fn test_touching_shapes_do_not_overlap() {
    let a = common::solid(10, 10);
    let b = common::solid(10, 10);
    assert!(!geometry::overlaps(&Shape::new(0, 0, &a), &Shape::new(10, 0, &b)));
    assert!(!geometry::overlaps(&Shape::new(0, 0, &a), &Shape::new(0, 10, &b)));
}

#[test]
fn test_transparent_pixels_never_collide() {
    let a = right_half();
    let b = common::solid(4, 10);

    // `b` covers columns 1..5 of `a`, all transparent.
    assert!(!geometry::overlaps(&Shape::new(0, 0, &a), &Shape::new(1, 0, &b)));
    // One column further reaches the first opaque column.
    assert!(geometry::overlaps(&Shape::new(0, 0, &a), &Shape::new(2, 0, &b)));
}

#[test]
fn test_overlap_is_symmetric() {
    let a = right_half();
    let b = common::solid(4, 10);
    for x in -5..12 {
        let left = Shape::new(0, 0, &a);
        let right = Shape::new(x, 3, &b);
        assert_eq!(geometry::overlaps(&left, &right), geometry::overlaps(&right, &left), "x = {x}");
    }
}

#[test]
fn test_empty_mask_never_collides() {
    let empty = Mask::empty(10, 10);
    let solid = common::solid(10, 10);
    assert!(!geometry::overlaps(&Shape::new(0, 0, &empty), &Shape::new(0, 0, &solid)));
}

#[test]
fn test_mirrored_mask_flips_collisions() {
    let mirrored = right_half().mirrored();
    let b = common::solid(4, 10);

    assert!(geometry::overlaps(&Shape::new(0, 0, &mirrored), &Shape::new(1, 0, &b)));
    assert!(!geometry::overlaps(&Shape::new(0, 0, &mirrored), &Shape::new(5, 0, &b)));
    assert_eq!(mirrored.count(), 50);
}

#[test]
fn test_first_overlap_finds_the_hit() {
    let probe = common::solid(10, 10);
    let wall = common::solid(10, 10);
    let others = [Shape::new(100, 0, &wall), Shape::new(5, 5, &wall), Shape::new(8, 8, &wall)];

    let hit = geometry::first_overlap(&Shape::new(0, 0, &probe), &others).expect("should hit");
    assert_eq!(hit.rect.top_left(), IVec2::new(5, 5));
    assert_that(&geometry::first_overlap(&Shape::new(50, 50, &probe), &others)).is_none();
}

#[test]
fn test_shape_rect_matches_mask() {
    let mask = common::solid(4, 6);
    let shape = Shape::new(10, 20, &mask);
    assert_eq!(shape.rect, Rect::new(10, 20, 4, 6));
    assert_eq!(shape.rect.size(), glam::UVec2::new(4, 6));
}

#[test]
fn test_mask_from_alpha() {
    let alpha = [0, 255, 128, 126];
    let mask = Mask::from_alpha(2, 2, &alpha, 127).expect("sizes match");
    assert!(!mask.get(0, 0));
    assert!(mask.get(1, 0));
    assert!(mask.get(0, 1));
    assert!(!mask.get(1, 1));
    assert_that(&Mask::from_alpha(3, 2, &alpha, 127)).is_none();
}

mod rect_tests {
    use super::*;

    #[test]
    fn edges_are_exclusive() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert!(rect.contains_point(IVec2::new(10, 20)));
        assert!(!rect.contains_point(IVec2::new(40, 20)));
        assert!(!rect.contains_point(IVec2::new(10, 60)));
    }

    #[test]
    fn intersection_requires_shared_area() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersection(&Rect::new(5, 5, 10, 10)), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 10, 10)), None);
        assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
    }

    #[test]
    fn inflate_and_contain() {
        let a = Rect::new(10, 10, 10, 10);
        let grown = a.inflated(5);
        assert_eq!(grown, Rect::new(5, 5, 20, 20));
        assert!(grown.contains_rect(&a));
        assert!(!a.contains_rect(&grown));
        assert!(Rect::new(0, 0, 0, 5).is_empty());
    }
}
