use crate::config::OcrConfig;
use crate::error::{Result, ScribeError};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

/// Reject uploads that are empty or whose magic number is not an image.
///
/// Runs before decoding so malformed input is reported as a client error.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(ScribeError::Validation("Image is empty".to_string()));
    }

    if !infer::is_image(bytes) {
        return Err(ScribeError::Validation(
            "Uploaded file is not a recognized image".to_string(),
        ));
    }

    Ok(())
}

/// Normalize image bytes for OCR.
///
/// 1. Decodes the image (format guessed from content)
/// 2. Rejects images below the minimum dimension
/// 3. Downscales images above the maximum dimension, keeping aspect ratio
/// 4. Converts to grayscale and stretches contrast
///
/// Returns PNG bytes.
pub fn preprocess_image(bytes: &[u8], config: &OcrConfig) -> Result<Vec<u8>> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ScribeError::Ocr(format!("Failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| ScribeError::Ocr(format!("Unsupported image format: {e}")))?;

    let (width, height) = img.dimensions();
    if width < config.min_image_dimension || height < config.min_image_dimension {
        return Err(ScribeError::Validation(format!(
            "Image too small: {}x{}, minimum {}x{}",
            width, height, config.min_image_dimension, config.min_image_dimension
        )));
    }

    let img = resize_if_needed(img, config.max_image_dimension);
    let img = enhance_contrast(img.grayscale());

    let mut output = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| ScribeError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Uses Lanczos3 for downscaling.
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = if width > height {
        max_dim as f32 / width as f32
    } else {
        max_dim as f32 / height as f32
    };

    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

fn enhance_contrast(img: DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(stretch_histogram(img.to_luma8()))
}

/// Maps the darkest pixel to 0 and the lightest to 255, scaling linearly.
fn stretch_histogram(gray: image::GrayImage) -> image::GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    // flat image
    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    image::GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y);
        let normalized = (pixel[0] - min_val) as f32 / range;
        image::Luma([(normalized * 255.0) as u8])
    })
}
