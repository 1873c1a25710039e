//! Mask synthesis for inpainting.
//!
//! A mask has the same pixel dimensions as the working image. Pixels outside
//! the selection are [`KEEP`] (black) and pixels inside are [`REPLACE`]
//! (white). A pixel counts as inside when its center `(x + 0.5, y + 0.5)`
//! lies inside the shape.

use egui::{Pos2, Rect};
use image::{GrayImage, Luma};

use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::image_buffer::{InlineImage, encode_png};
use crate::selection::{MIN_LASSO_POINTS, MIN_POLYGON_POINTS, Selection};

pub const KEEP: Luma<u8> = Luma([0]);
pub const REPLACE: Luma<u8> = Luma([255]);

/// A rasterized mask together with its embeddable encoding
#[derive(Debug, Clone)]
pub struct MaskImage {
    pub raster: GrayImage,
    pub encoded: InlineImage,
}

impl MaskImage {
    pub fn from_selection(selection: &Selection, width: u32, height: u32) -> EditorResult<Self> {
        let raster = rasterize(selection, width, height)?;
        let encoded = encode(&raster)?;
        Ok(Self { raster, encoded })
    }

    /// Number of pixels marked for replacement
    pub fn covered_pixels(&self) -> usize {
        self.raster.pixels().filter(|p| **p == REPLACE).count()
    }
}

/// Builds the mask for the document's committed selection
pub fn build_mask(document: &Document) -> EditorResult<MaskImage> {
    let selection = document.selection().ok_or(EditorError::NoSelection)?;
    let (width, height) = document.dimensions();
    MaskImage::from_selection(selection, width, height)
}

/// Rasterizes `selection` into a `width` x `height` mask
pub fn rasterize(selection: &Selection, width: u32, height: u32) -> EditorResult<GrayImage> {
    if width == 0 || height == 0 {
        return Err(EditorError::EmptyCanvas { width, height });
    }

    let mut mask = GrayImage::from_pixel(width, height, KEEP);
    match selection {
        Selection::Rectangle { rect } => fill_rect(&mut mask, *rect),
        Selection::Ellipse { rect } => fill_ellipse(&mut mask, *rect),
        Selection::Polygon { points } => {
            debug_assert!(
                points.len() >= MIN_POLYGON_POINTS,
                "polygon selections are committed with at least three points"
            );
            if points.len() < MIN_POLYGON_POINTS {
                return Err(EditorError::InvalidSelection(format!(
                    "polygon has {} points, needs at least {}",
                    points.len(),
                    MIN_POLYGON_POINTS
                )));
            }
            fill_path(&mut mask, points);
        }
        Selection::Lasso { points } => {
            if points.len() < MIN_LASSO_POINTS {
                return Err(EditorError::InvalidSelection(format!(
                    "lasso has {} points, needs at least {}",
                    points.len(),
                    MIN_LASSO_POINTS
                )));
            }
            fill_path(&mut mask, points);
        }
    }

    Ok(mask)
}

/// PNG-encodes a mask into the same payload form as the working image
pub fn encode(mask: &GrayImage) -> EditorResult<InlineImage> {
    let bytes = encode_png(mask)?;
    Ok(InlineImage::from_bytes("image/png", &bytes))
}

/// Index of the first pixel whose center is at or after `edge`
fn first_center_at_or_after(edge: f32) -> i64 {
    (edge - 0.5).ceil() as i64
}

/// Clamped half-open pixel range whose centers fall in `[from, to)`
fn center_span(from: f32, to: f32, limit: u32) -> std::ops::Range<u32> {
    let start = first_center_at_or_after(from).clamp(0, limit as i64) as u32;
    let end = first_center_at_or_after(to).clamp(0, limit as i64) as u32;
    start..end.max(start)
}

fn fill_rect(mask: &mut GrayImage, rect: Rect) {
    let (width, height) = mask.dimensions();
    let cols = center_span(rect.min.x, rect.max.x, width);
    for y in center_span(rect.min.y, rect.max.y, height) {
        for x in cols.clone() {
            mask.put_pixel(x, y, REPLACE);
        }
    }
}

fn fill_ellipse(mask: &mut GrayImage, rect: Rect) {
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }

    let (width, height) = mask.dimensions();
    let center = rect.center();
    for y in center_span(rect.min.y, rect.max.y, height) {
        let dy = (y as f32 + 0.5 - center.y) / ry;
        let remaining = 1.0 - dy * dy;
        if remaining < 0.0 {
            continue;
        }
        let half = rx * remaining.sqrt();
        // Closed interval: centers exactly on the boundary are inside
        let start = ((center.x - half - 0.5).ceil() as i64).clamp(0, width as i64) as u32;
        let end = (((center.x + half - 0.5).floor() as i64) + 1).clamp(0, width as i64) as u32;
        for x in start..end {
            mask.put_pixel(x, y, REPLACE);
        }
    }
}

/// Scanline fill of a closed path using the non-zero winding rule
fn fill_path(mask: &mut GrayImage, points: &[Pos2]) {
    let (width, height) = mask.dimensions();
    let bounds = Rect::from_points(points);
    let rows = center_span(bounds.min.y, bounds.max.y, height);

    let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(points.len());
    for y in rows {
        let yc = y as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let winding = if a.y <= yc && b.y > yc {
                1
            } else if b.y <= yc && a.y > yc {
                -1
            } else {
                continue;
            };
            let t = (yc - a.y) / (b.y - a.y);
            crossings.push((a.x + t * (b.x - a.x), winding));
        }

        crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            if winding != 0 {
                for x in center_span(pair[0].0, pair[1].0, width) {
                    mask.put_pixel(x, y, REPLACE);
                }
            }
        }
    }
}
