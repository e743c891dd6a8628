//! Thumbnail fetching for the GUI

use eframe::egui::ColorImage;
use tracing::debug;

/// Fetch and decode a thumbnail, scaled down for display.
///
/// Any failure just means no thumbnail is shown.
pub fn fetch_thumbnail(url: &str) -> Option<ColorImage> {
    let bytes = reqwest::blocking::get(url).ok()?.bytes().ok()?;
    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img.thumbnail(240, 135),
        Err(e) => {
            debug!("thumbnail decode failed: {}", e);
            return None;
        }
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, &rgba))
}
