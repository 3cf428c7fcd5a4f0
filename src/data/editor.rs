// ============================================================
// Layer 4 - Image Editor
// ============================================================
// Rotate / mirror / save. The edits are pure functions over an
// in-memory DynamicImage; the classifier can consume the edited
// image directly without writing it to disk first.
//
// Saving picks the encoder from the output file extension
// (.png, .jpg, .bmp, ...), the same way image::save does.

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageFormat};
use std::path::Path;

use crate::domain::edit::EditOp;

pub fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Cannot open image '{}'", path.display()))
}

pub fn apply(img: DynamicImage, op: EditOp) -> DynamicImage {
    match op {
        EditOp::RotateLeft  => img.rotate270(),
        EditOp::RotateRight => img.rotate90(),
        EditOp::Mirror      => img.fliph(),
    }
}

/// Apply edits left to right.
pub fn apply_all(img: DynamicImage, ops: &[EditOp]) -> DynamicImage {
    ops.iter().fold(img, |img, &op| apply(img, op))
}

pub fn save(img: &DynamicImage, path: &Path) -> Result<()> {
    let format = match ImageFormat::from_path(path) {
        Ok(f) => f,
        Err(_) => bail!(
            "Cannot tell image format from '{}'; use a .png, .jpg or .bmp extension",
            path.display()
        ),
    };

    // JPEG has no alpha channel. Only PNG and TIFF encode more than
    // 8 bits per channel.
    let color   = img.color();
    let is_wide = color.bytes_per_pixel() > color.channel_count();
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::Png | ImageFormat::Tiff => img.clone(),
        _ if is_wide && color.has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ if is_wide => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img.clone(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    img.save_with_format(path, format)
        .with_context(|| format!("Cannot save image to '{}'", path.display()))?;
    tracing::debug!("Saved image to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    // 3x2 image with a distinct top-left pixel.
    fn sample() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let img = apply(sample(), EditOp::RotateRight);
        assert_eq!(img.dimensions(), (2, 3));
        // clockwise: top-left moves to top-right
        assert_eq!(img.get_pixel(1, 0), Rgba([255, 0, 0, 255]));

        let img = apply(sample(), EditOp::RotateLeft);
        // counter-clockwise: top-left moves to bottom-left
        assert_eq!(img.get_pixel(0, 2), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_inverse_edits_restore_the_image() {
        let original = sample();
        let back = apply_all(original.clone(), &[EditOp::RotateLeft, EditOp::RotateRight]);
        assert_eq!(back.to_rgba8(), original.to_rgba8());

        let back = apply_all(original.clone(), &[EditOp::Mirror, EditOp::Mirror]);
        assert_eq!(back.to_rgba8(), original.to_rgba8());
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let img = apply(sample(), EditOp::Mirror);
        assert_eq!(img.get_pixel(2, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let png = tmp.path().join("out/edited.png");
        save(&sample(), &png).unwrap();
        assert_eq!(open(&png).unwrap().dimensions(), (3, 2));

        let jpg = tmp.path().join("edited.jpg");
        save(&sample(), &jpg).unwrap();
        assert!(jpg.exists());
    }

    #[test]
    fn test_sixteen_bit_image_saves_as_bmp() {
        let tmp  = tempfile::tempdir().unwrap();
        let wide = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(4, 3, image::Rgb([40000u16, 0, 65535])));

        let bmp = tmp.path().join("edited.bmp");
        save(&wide, &bmp).unwrap();
        let reopened = open(&bmp).unwrap();
        assert_eq!(reopened.dimensions(), (4, 3));
        assert_eq!(reopened.color().bytes_per_pixel(), reopened.color().channel_count());

        // PNG keeps the full depth
        let png = tmp.path().join("edited.png");
        save(&wide, &png).unwrap();
        assert_eq!(open(&png).unwrap().color(), image::ColorType::Rgb16);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(save(&sample(), &tmp.path().join("edited.xyz")).is_err());
    }
}
