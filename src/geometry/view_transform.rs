use egui::{Pos2, Rect, Vec2};

/// Maps between viewport space and image space for an image that is
/// scaled to fit and centered inside a viewport of arbitrary size.
///
/// Viewport coordinates are relative to the top-left of the canvas area,
/// image coordinates are in native image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    viewport: Vec2,
    image: Vec2,
    scale: f32,
    offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            viewport: Vec2::ZERO,
            image: Vec2::ZERO,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Computes the uniform scale-to-fit transform for `image` inside `viewport`
    pub fn fit(viewport: Vec2, image: Vec2) -> Self {
        if image.x <= 0.0 || image.y <= 0.0 {
            return Self {
                viewport,
                ..Self::default()
            };
        }

        let scale = (viewport.x / image.x).min(viewport.y / image.y);
        let offset = Vec2::new(
            (viewport.x - image.x * scale) / 2.0,
            (viewport.y - image.y * scale) / 2.0,
        );

        Self {
            viewport,
            image,
            scale,
            offset,
        }
    }

    /// False when there is no image, or the viewport has collapsed to nothing
    pub fn is_valid(&self) -> bool {
        self.image.x > 0.0 && self.image.y > 0.0 && self.scale.is_finite() && self.scale > 0.0
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    pub fn image_size(&self) -> Vec2 {
        self.image
    }

    /// Converts a viewport-relative pointer position into image space.
    /// Returns the origin when the transform is not valid.
    pub fn to_image(&self, pointer: Pos2) -> Pos2 {
        if !self.is_valid() {
            return Pos2::ZERO;
        }
        ((pointer - self.offset).to_vec2() / self.scale).to_pos2()
    }

    /// Converts an image-space point into viewport-relative coordinates
    pub fn to_screen(&self, point: Pos2) -> Pos2 {
        if !self.is_valid() {
            return Pos2::ZERO;
        }
        (point.to_vec2() * self.scale).to_pos2() + self.offset
    }

    /// Converts a length measured in screen pixels into image pixels
    pub fn screen_len_to_image(&self, len: f32) -> f32 {
        if !self.is_valid() {
            return len;
        }
        len / self.scale
    }

    /// The on-screen rectangle covered by the image, for a canvas placed at `canvas`
    pub fn image_rect_in(&self, canvas: Rect) -> Rect {
        Rect::from_min_size(canvas.min + self.offset, self.image * self.scale)
    }
}
