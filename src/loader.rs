use image::{DynamicImage, GrayImage};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Decodes the file at `path` and reduces it to 8-bit grayscale.
pub fn load(path: &Path) -> Result<GrayImage, LoadError> {
    let gray = to_gray(image::open(path)?)?;
    log::debug!(
        "decoded {} as {}x{} grayscale",
        path.display(),
        gray.width(),
        gray.height()
    );
    Ok(gray)
}

/// Reduces a decoded image to one channel. An image without pixels counts
/// as a failed load.
fn to_gray(decoded: DynamicImage) -> Result<GrayImage, LoadError> {
    let gray = decoded.into_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage { width, height });
    }
    Ok(gray)
}

/// Asks the user for an image through the native open dialog.
pub fn pick_image_path() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Image File")
        .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "gif"])
        .add_filter("All files", &["*"])
        .pick_file()
}
