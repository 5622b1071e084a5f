//! Normalized output layout.
//!
//! Derived once per directory from its [`SourceLayout`]:
//!
//! - bytes per channel: `max(1, bits_per_sample / 8)`
//! - YCbCr and Lab become 3-channel RGB
//! - everything else keeps its channel count and colour model

use tiffnorm_core::{Diagnostics, ImageSemantics, ImageTarget, PixelFormat, SampleFormat, UntypedLayout};

use crate::{SourceLayout, TiffError, TiffResult};

/// Shape and meaning of the normalized buffer for one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved channels.
    pub channels: u16,
    /// Bytes per channel sample (1 or 2).
    pub bytes_per_channel: u16,
    /// Colour model.
    pub pixel_format: PixelFormat,
    /// Numeric sample type.
    pub sample_format: SampleFormat,
}

impl OutputLayout {
    /// Derives the normalized layout for `src`.
    pub fn derive(src: &SourceLayout) -> Self {
        let converted = src.is_ycbcr() || src.is_lab();
        let (channels, pixel_format) = if converted {
            (3, PixelFormat::Rgb)
        } else {
            (src.samples_per_pixel, src.pixel_format())
        };
        Self {
            width: src.width,
            height: src.height,
            channels,
            bytes_per_channel: (src.bits_per_sample >> 3).max(1),
            pixel_format,
            sample_format: src.sample_format.to_sample_format(),
        }
    }

    /// Buffer shape.
    #[inline]
    pub fn untyped(&self) -> UntypedLayout {
        UntypedLayout::new(self.width, self.height, self.channels, self.bytes_per_channel)
    }

    /// Buffer tags.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        ImageSemantics::new(self.pixel_format, self.sample_format)
    }

    /// Bytes of one interleaved pixel.
    #[inline]
    pub fn pixel_bytes(&self) -> usize {
        self.channels as usize * self.bytes_per_channel as usize
    }
}

/// Sizes or validates `target` for `out`.
///
/// This is the only place a destination buffer is resized. A rejection is
/// logged and returned as [`TiffError::LayoutRejected`].
pub fn prepare_target<T>(target: &mut T, out: &OutputLayout, log: &mut dyn Diagnostics) -> TiffResult<()>
where
    T: ImageTarget + ?Sized,
{
    if target.prepare(&out.untyped(), out.semantics()) {
        return Ok(());
    }
    log.error(
        "Cannot prepare input image or view; most likely it is a view that cannot be resized."
            .into(),
    );
    Err(TiffError::LayoutRejected {
        width: out.width,
        height: out.height,
        channels: out.channels,
        bytes_per_channel: out.bytes_per_channel,
    })
}
