//! Thumbnail decoding to RGBA8.

use std::io::Cursor;
use std::path::Path;

use thumbstream_types::image::{ImageFormat, detect_format};
use thumbstream_types::{FetchError, PixelImage};

/// Decode an image file's bytes. PNG goes through the `png` decoder;
/// JPEG, BMP and TGA go through `image`.
pub fn decode_image(data: &[u8], path: &Path) -> Result<PixelImage, FetchError> {
    let ext = path.extension().and_then(|e| e.to_str());
    match detect_format(data, ext) {
        ImageFormat::Png => decode_png(data),
        ImageFormat::Jpeg => decode_with(data, image::ImageFormat::Jpeg),
        ImageFormat::Bmp => decode_with(data, image::ImageFormat::Bmp),
        ImageFormat::Tga => decode_with(data, image::ImageFormat::Tga),
        ImageFormat::Unknown => Err(FetchError::Decode(format!(
            "{}: unrecognised image data",
            path.display()
        ))),
    }
}

fn decode_with(data: &[u8], format: image::ImageFormat) -> Result<PixelImage, FetchError> {
    let rgba = image::load_from_memory_with_format(data, format)
        .map_err(|e| match e {
            image::ImageError::Unsupported(u) => FetchError::Unsupported(u.to_string()),
            other => FetchError::Decode(other.to_string()),
        })?
        .to_rgba8();
    Ok(PixelImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Decode a PNG, expanding palette and low bit depths and stripping
/// 16-bit channels to 8.
pub fn decode_png(data: &[u8]) -> Result<PixelImage, FetchError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let pixel_count = info.width as usize * info.height as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);
    match info.color_type {
        png::ColorType::Rgba => rgba.extend_from_slice(data),
        png::ColorType::Rgb => {
            for chunk in data.chunks_exact(3) {
                rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 0xFF]);
            }
        }
        png::ColorType::Grayscale => {
            for &g in data {
                rgba.extend_from_slice(&[g, g, g, 0xFF]);
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for chunk in data.chunks_exact(2) {
                rgba.extend_from_slice(&[chunk[0], chunk[0], chunk[0], chunk[1]]);
            }
        }
        other => {
            return Err(FetchError::Unsupported(format!("PNG color type {other:?}")));
        }
    }

    Ok(PixelImage {
        width: info.width,
        height: info.height,
        pixels: rgba,
    })
}

/// Encode RGBA8 pixels as PNG. Used to build fixtures.
#[cfg(test)]
pub(crate) fn encode_png(image: &PixelImage) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&image.pixels).unwrap();
    }
    out
}

/// Encode RGBA8 pixels as BMP. Used to build fixtures.
#[cfg(test)]
pub(crate) fn encode_bmp(image: &PixelImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
        .unwrap()
        .write_to(&mut out, image::ImageFormat::Bmp)
        .unwrap();
    out.into_inner()
}

/// Encode a gray RGB image as JPEG. Used to build fixtures.
#[cfg(test)]
pub(crate) fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128]))
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_png_roundtrips() {
        let image = PixelImage::solid(3, 2, [10, 20, 30, 40]);
        let decoded = decode_png(&encode_png(&image)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rgb_png_gets_opaque_alpha() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3]).unwrap();
        }
        let decoded = decode_png(&out).unwrap();
        assert_eq!(decoded.pixels, vec![1, 2, 3, 0xFF]);
    }

    #[test]
    fn grayscale_png_expands() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 1);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[7, 9]).unwrap();
        }
        let decoded = decode_png(&out).unwrap();
        assert_eq!(decoded.pixels, vec![7, 7, 7, 0xFF, 9, 9, 9, 0xFF]);
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encode_png(&PixelImage::solid(4, 4, [0; 4]));
        let err = decode_png(&bytes[..20]).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn bmp_decodes_to_rgba() {
        let image = PixelImage::solid(3, 2, [10, 20, 30, 255]);
        let decoded = decode_image(&encode_bmp(&image), Path::new("a.bmp")).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn jpeg_decodes_to_rgba() {
        let decoded = decode_image(&encode_jpeg(5, 4), Path::new("a.jpg")).unwrap();
        assert_eq!((decoded.width, decoded.height), (5, 4));
        assert_eq!(decoded.pixels.len(), 5 * 4 * 4);
        assert!(decoded.pixels.chunks_exact(4).all(|p| p[3] == 0xFF));
    }

    #[test]
    fn truncated_jpeg_is_decode_error() {
        let bytes = encode_jpeg(8, 8);
        let err = decode_image(&bytes[..12], Path::new("a.jpg")).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = decode_image(b"not an image", Path::new("a.png")).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
