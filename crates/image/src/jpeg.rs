use {
    crate::*,
    crates_image::{
        DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, codecs::jpeg::JpegEncoder,
    },
    std::borrow::Cow,
};

/// Encode an `Rgb8`, `Rgba8` or `Gray8` image as JPEG; alpha is dropped.
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (data, color_type) = match image.format {
        PixelFormat::Rgb8 => (Cow::Borrowed(&image.data[..]), ExtendedColorType::Rgb8),
        PixelFormat::Gray8 => (Cow::Borrowed(&image.data[..]), ExtendedColorType::L8),
        PixelFormat::Rgba8 => {
            let stripped: Vec<u8> = image
                .data
                .chunks_exact(4)
                .flat_map(|c| &c[..3])
                .copied()
                .collect();
            (Cow::Owned(stripped), ExtendedColorType::Rgb8)
        }
        other => return Err(ImageError::UnsupportedFormat(other)),
    };

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            &data,
            image.size.x as u32,
            image.size.y as u32,
            color_type,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decode a JPEG bitstream into `frame`.
///
/// Grayscale streams produce a `Gray8` frame, everything else `Rgb8`.
pub fn decode_jpeg(data: &[u8], frame: &mut Frame) -> Result<(), ImageError> {
    let decoded = crates_image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
    frame.location = FrameLocation::Host;
    match decoded {
        DynamicImage::ImageLuma8(buf) => {
            let (width, height) = buf.dimensions();
            frame.reshape(
                Vec2::new(width as usize, height as usize),
                PixelFormat::Gray8,
            )?;
            frame.write_rows(0, buf.as_raw(), width as usize)
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            frame.reshape(
                Vec2::new(width as usize, height as usize),
                PixelFormat::Rgb8,
            )?;
            frame.write_rows(0, rgb.as_raw(), width as usize * 3)
        }
    }
}
