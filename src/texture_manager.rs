use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::image_buffer::ImageBuffer;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Keeps the GPU texture for the working image, re-uploading only when the
/// image buffer is replaced
#[derive(Default)]
pub struct TextureManager {
    cached: Option<(u64, TextureHandle)>,
    uploads: usize,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the texture for `image`, creating it if the image changed
    pub fn texture_for(
        &mut self,
        image: &ImageBuffer,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError> {
        self.get_or_create_texture(image.generation(), || {
            if image.width() == 0 || image.height() == 0 {
                return Err(TextureGenerationError::InvalidDimensions(image.width(), image.height()));
            }
            Ok(image.to_color_image())
        }, ctx)
    }

    pub fn get_or_create_texture<F>(
        &mut self,
        generation: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        if let Some((cached_generation, handle)) = &self.cached {
            if *cached_generation == generation {
                return Ok(handle.id());
            }
        }

        let image = generator()?;
        let name = format!("working_image_{}", generation);
        let handle = ctx.load_texture(&name, image, TextureOptions::LINEAR);
        log::debug!("Uploaded texture {}", name);

        let id = handle.id();
        // Dropping the old handle frees the previous upload
        self.cached = Some((generation, handle));
        self.uploads += 1;
        Ok(id)
    }

    /// Drops the cached texture
    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    pub fn cached_generation(&self) -> Option<u64> {
        self.cached.as_ref().map(|(generation, _)| *generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_texture_generator() -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new();

        let texture_id1 = manager.get_or_create_texture(1, mock_texture_generator, &ctx).unwrap();
        let texture_id2 = manager.get_or_create_texture(1, mock_texture_generator, &ctx).unwrap();

        assert_eq!(texture_id1, texture_id2);
        assert_eq!(manager.upload_count(), 1);
    }

    #[test]
    fn test_new_generation_reuploads() {
        let ctx = Context::default();
        let mut manager = TextureManager::new();

        manager.get_or_create_texture(1, mock_texture_generator, &ctx).unwrap();
        manager.get_or_create_texture(2, mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.upload_count(), 2);
        assert_eq!(manager.cached_generation(), Some(2));
    }

    #[test]
    fn test_generator_error_keeps_cache() {
        let ctx = Context::default();
        let mut manager = TextureManager::new();
        manager.get_or_create_texture(1, mock_texture_generator, &ctx).unwrap();

        let result = manager.get_or_create_texture(
            2,
            || Err(TextureGenerationError::InvalidDimensions(0, 0)),
            &ctx,
        );
        assert!(result.is_err());
        assert_eq!(manager.cached_generation(), Some(1));

        manager.clear();
        assert_eq!(manager.cached_generation(), None);
    }
}
