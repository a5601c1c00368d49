//! Uploaded-image processing: decode, resize, re-encode to JPEG.
//!
//! Filenames embed the owning record's id and a timestamp, so concurrent
//! uploads for different records never collide on disk.

use std::path::PathBuf;

use super::error::ApiError;

/// Re-encode quality for all processed uploads
pub const JPEG_QUALITY: u8 = 90;

/// Square avatar size for user photos
pub const USER_PHOTO_SIZE: (u32, u32) = (500, 500);

/// 3:2 display size for tour cover and gallery images
pub const TOUR_IMAGE_SIZE: (u32, u32) = (2000, 1333);

/// Whether a multipart field looks like an image upload
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    matches!(content_type, Some(t) if t.starts_with("image/"))
}

pub fn user_photo_filename(user_id: &str, timestamp: i64) -> String {
    format!("user-{}-{}.jpeg", user_id, timestamp)
}

pub fn tour_cover_filename(tour_id: &str, timestamp: i64) -> String {
    format!("tour-{}-{}-cover.jpeg", tour_id, timestamp)
}

pub fn tour_image_filename(tour_id: &str, timestamp: i64, index: usize) -> String {
    format!("tour-{}-{}-{}.jpeg", tour_id, timestamp, index)
}

/// Decode an uploaded image, resize it to exactly `width`×`height`
/// (center-cropped), and write it to `dest` as a JPEG.
///
/// The decode/resize/encode pipeline is CPU-bound and runs on the
/// blocking pool.
pub async fn save_resized_jpeg(
    data: Vec<u8>,
    dest: PathBuf,
    width: u32,
    height: u32,
) -> Result<(), ApiError> {
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        let img = image::load_from_memory(&data)
            .map_err(|e| ApiError::bad_request(format!("Could not decode image: {}", e)))?;

        let resized = img.resize_to_fill(width, height, image::imageops::FilterType::Lanczos3);

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create upload directory: {}", e);
                ApiError::internal("Could not store image")
            })?;
        }

        let file = std::fs::File::create(&dest).map_err(|e| {
            tracing::error!(path = %dest.display(), "Failed to create image file: {}", e);
            ApiError::internal("Could not store image")
        })?;
        let mut writer = std::io::BufWriter::new(file);
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        encoder.encode_image(&resized.to_rgb8()).map_err(|e| {
            tracing::error!("Failed to encode image: {}", e);
            ApiError::internal("Could not store image")
        })?;

        Ok(())
    })
    .await
    .map_err(|e| {
        tracing::error!("Image resize task panicked: {}", e);
        ApiError::internal("Could not store image")
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn resizes_to_exact_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("img/users/user-1-1.jpeg");

        save_resized_jpeg(png_fixture(800, 600), dest.clone(), 500, 500)
            .await
            .unwrap();

        let written = image::open(&dest).unwrap();
        assert_eq!(written.width(), 500);
        assert_eq!(written.height(), 500);
    }

    #[tokio::test]
    async fn rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.jpeg");
        let err = save_resized_jpeg(b"definitely not an image".to_vec(), dest, 100, 100)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn filenames_embed_id_and_timestamp() {
        assert_eq!(user_photo_filename("u1", 42), "user-u1-42.jpeg");
        assert_eq!(tour_cover_filename("t1", 42), "tour-t1-42-cover.jpeg");
        assert_eq!(tour_image_filename("t1", 42, 2), "tour-t1-42-2.jpeg");
    }

    #[test]
    fn content_type_gate() {
        assert!(is_image_content_type(Some("image/jpeg")));
        assert!(is_image_content_type(Some("image/png")));
        assert!(!is_image_content_type(Some("application/pdf")));
        assert!(!is_image_content_type(None));
    }
}
