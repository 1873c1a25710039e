use egui::{Pos2, Rect};
use studio_editor::mask::{self, KEEP, MaskImage, REPLACE};
use studio_editor::{Document, EditorError, ImageBuffer, Selection};

fn all_variants() -> Vec<Selection> {
    vec![
        Selection::Rectangle {
            rect: Rect::from_min_max(Pos2::new(5.0, 5.0), Pos2::new(25.0, 15.0)),
        },
        Selection::Ellipse {
            rect: Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(40.0, 20.0)),
        },
        Selection::Polygon {
            points: vec![Pos2::new(2.0, 2.0), Pos2::new(30.0, 4.0), Pos2::new(12.0, 18.0)],
        },
        Selection::Lasso {
            points: vec![
                Pos2::new(-10.0, -10.0),
                Pos2::new(50.0, 0.0),
                Pos2::new(35.0, 30.0),
                Pos2::new(5.0, 25.0),
            ],
        },
    ]
}

#[test]
fn test_mask_matches_image_dimensions_for_every_shape() {
    for selection in all_variants() {
        let mask = mask::rasterize(&selection, 32, 20).unwrap();
        assert_eq!(mask.dimensions(), (32, 20), "{:?}", selection.kind());
        assert!(
            mask.pixels().all(|p| *p == KEEP || *p == REPLACE),
            "mask must be strictly binary"
        );
        assert!(mask.pixels().any(|p| *p == REPLACE), "{:?} covered nothing", selection.kind());
    }
}

#[test]
fn test_rasterizing_twice_gives_identical_masks() {
    for selection in all_variants() {
        let first = mask::rasterize(&selection, 32, 20).unwrap();
        let second = mask::rasterize(&selection, 32, 20).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_selection_outside_image_is_clipped() {
    let selection = Selection::Rectangle {
        rect: Rect::from_min_max(Pos2::new(-100.0, -100.0), Pos2::new(-10.0, -10.0)),
    };
    let mask = mask::rasterize(&selection, 16, 16).unwrap();
    assert!(mask.pixels().all(|p| *p == KEEP));
}

#[test]
fn test_zero_sized_image_is_rejected() {
    let selection = Selection::Rectangle {
        rect: Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(4.0, 4.0)),
    };
    assert!(matches!(
        mask::rasterize(&selection, 0, 10),
        Err(EditorError::EmptyCanvas { width: 0, height: 10 })
    ));
}

#[test]
fn test_document_mask_uses_image_size() {
    let mut document = Document::new();
    let pixels = image::RgbaImage::from_pixel(24, 12, image::Rgba([9, 9, 9, 255]));
    document.set_image(ImageBuffer::from_rgba(pixels).unwrap());
    assert!(matches!(mask::build_mask(&document), Err(EditorError::NoSelection)));

    document.set_selection(Selection::Rectangle {
        rect: Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(12.0, 12.0)),
    });
    let mask: MaskImage = mask::build_mask(&document).unwrap();

    assert_eq!(mask.raster.dimensions(), (24, 12));
    assert_eq!(mask.covered_pixels(), 144);
    assert_eq!(mask.encoded.mime_type, "image/png");
    assert!(mask.encoded.bytes().unwrap().starts_with(b"\x89PNG"));
}
