//! Byte-level layout and semantic tags of a normalized image.
//!
//! [`UntypedLayout`] describes the shape of a buffer without saying what the
//! bytes mean; [`ImageSemantics`] adds the colour model and sample type.
//! Together they are what a reader negotiates with a destination buffer
//! before any pixel is moved.
//!
//! # Example
//!
//! ```rust
//! use tiffnorm_core::UntypedLayout;
//!
//! let layout = UntypedLayout::new(640, 480, 3, 2);
//! assert_eq!(layout.pixel_bytes(), 6);
//! assert_eq!(layout.row_bytes(), 640 * 6);
//! ```

use crate::{Error, PixelFormat, Result, SampleFormat};

/// Shape of an interleaved, row-major pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UntypedLayout {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Interleaved channels per pixel
    pub channels: u16,
    /// Bytes per channel sample (1 or 2 for normalized buffers)
    pub bytes_per_channel: u16,
}

impl UntypedLayout {
    /// Creates a layout.
    #[inline]
    pub const fn new(width: u32, height: u32, channels: u16, bytes_per_channel: u16) -> Self {
        Self {
            width,
            height,
            channels,
            bytes_per_channel,
        }
    }

    /// Bytes occupied by one pixel.
    #[inline]
    pub const fn pixel_bytes(&self) -> usize {
        self.channels as usize * self.bytes_per_channel as usize
    }

    /// Bytes of one tightly packed row.
    #[inline]
    pub const fn row_bytes(&self) -> usize {
        self.width as usize * self.pixel_bytes()
    }

    /// Bytes of the whole image when tightly packed.
    #[inline]
    pub const fn byte_size(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    /// Checks that the layout can back a buffer.
    ///
    /// Zero width or height is allowed (an empty image); zero channels or
    /// zero bytes per channel is not.
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                "zero channels",
            ));
        }
        if self.bytes_per_channel == 0 {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                "zero bytes per channel",
            ));
        }
        (self.width as usize)
            .checked_mul(self.pixel_bytes())
            .and_then(|row| row.checked_mul(self.height as usize))
            .ok_or_else(|| Error::invalid_dimensions(self.width, self.height, "size overflow"))?;
        Ok(())
    }
}

/// Meaning of the bytes in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageSemantics {
    /// Colour model tag
    pub pixel_format: PixelFormat,
    /// Numeric sample tag
    pub sample_format: SampleFormat,
}

impl ImageSemantics {
    /// Creates semantics from both tags.
    #[inline]
    pub const fn new(pixel_format: PixelFormat, sample_format: SampleFormat) -> Self {
        Self {
            pixel_format,
            sample_format,
        }
    }
}
