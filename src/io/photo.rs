//! Image encoding for rendered photos.

use std::path::Path;

use anyhow::{Context, Result};

use crate::render::photo::Photo;

/// Writes a rendered photo to an image file.
///
/// The format is chosen from the file extension (png, bmp, jpg, ...).
pub fn write_photo(path: &Path, photo: &Photo) -> Result<()> {
    let mut img = image::RgbImage::new(photo.width() as u32, photo.height() as u32);
    for h in 0..photo.height() {
        for w in 0..photo.width() {
            let [r, g, b] = photo.pixels()[h * photo.width() + w];
            img.put_pixel(w as u32, h as u32, image::Rgb([r, g, b]));
        }
    }
    img.save(path)
        .with_context(|| format!("Failed to write image: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_png() {
        let photo = Photo::new(
            2,
            2,
            vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        );
        let path = std::env::temp_dir().join(format!("signal3d_{}_photo.png", std::process::id()));
        write_photo(&path, &photo).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_to_bad_path_fails() {
        let photo = Photo::new(1, 1, vec![[0, 0, 0]]);
        let result = write_photo(Path::new("/nonexistent/dir/photo.png"), &photo);
        assert!(result.is_err());
    }
}
