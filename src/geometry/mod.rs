pub mod view_transform;

pub use view_transform::ViewTransform;

use egui::{Pos2, Rect};

/// Normalized box spanned by two corners, regardless of drag direction
pub fn box_from_corners(a: Pos2, b: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(a.x.min(b.x), a.y.min(b.y)),
        egui::vec2((b.x - a.x).abs(), (b.y - a.y).abs()),
    )
}

/// Points approximating the ellipse inscribed in `rect`, for drawing outlines
pub fn ellipse_outline(rect: Rect, segments: usize) -> Vec<Pos2> {
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * std::f32::consts::TAU;
            Pos2::new(center.x + radius.x * t.cos(), center.y + radius.y * t.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_from_corners_any_direction() {
        let a = Pos2::new(100.0, 100.0);
        let b = Pos2::new(50.0, 50.0);
        assert_eq!(box_from_corners(a, b), box_from_corners(b, a));
        let rect = box_from_corners(a, b);
        assert_eq!(rect.min, Pos2::new(50.0, 50.0));
        assert_eq!(rect.width(), 50.0);
        assert_eq!(rect.height(), 50.0);
    }

    #[test]
    fn test_ellipse_outline_stays_in_box() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), egui::vec2(40.0, 10.0));
        for p in ellipse_outline(rect, 32) {
            assert!(rect.expand(0.01).contains(p));
        }
    }
}
