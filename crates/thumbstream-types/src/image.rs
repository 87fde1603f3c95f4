//! Decoded thumbnail pixels and image format sniffing.

/// Decoded image data (RGBA pixels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl PixelImage {
    /// Create an image filled with a single RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An image with a zero dimension cannot be presented.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Image format detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Tga,
    Unknown,
}

/// Detect image format from the first few bytes (magic numbers).
///
/// TGA has no magic number, so it is only reported when `ext_hint`
/// says so.
pub fn detect_format(data: &[u8], ext_hint: Option<&str>) -> ImageFormat {
    if data.len() >= 8 && data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        ImageFormat::Png
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageFormat::Jpeg
    } else if data.starts_with(b"BM") {
        ImageFormat::Bmp
    } else if ext_hint.is_some_and(|e| e.eq_ignore_ascii_case("tga")) {
        ImageFormat::Tga
    } else {
        ImageFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fills_every_pixel() {
        let img = PixelImage::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.byte_size(), 3 * 2 * 4);
        assert!(img.pixels.chunks(4).all(|p| p == [1, 2, 3, 4]));
        assert!(!img.is_empty());
    }

    #[test]
    fn zero_dimension_is_empty() {
        assert!(PixelImage::solid(0, 10, [0; 4]).is_empty());
        assert!(PixelImage::solid(10, 0, [0; 4]).is_empty());
    }

    #[test]
    fn detect_png() {
        let data = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(detect_format(&data, None), ImageFormat::Png);
    }

    #[test]
    fn detect_jpeg_and_bmp() {
        assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0], None), ImageFormat::Jpeg);
        assert_eq!(detect_format(b"BM\0\0\0\0", None), ImageFormat::Bmp);
    }

    #[test]
    fn tga_needs_extension_hint() {
        let data = [0u8, 0, 2, 0, 0, 0];
        assert_eq!(detect_format(&data, None), ImageFormat::Unknown);
        assert_eq!(detect_format(&data, Some("TGA")), ImageFormat::Tga);
    }

    #[test]
    fn short_input_is_unknown() {
        assert_eq!(detect_format(&[0x89], None), ImageFormat::Unknown);
        assert_eq!(detect_format(&[], None), ImageFormat::Unknown);
    }
}
