//! Pixel colour-model and sample-type tags.
//!
//! These tags describe how the bytes of a normalized buffer are to be
//! interpreted. They carry no data themselves.
//!
//! # Types
//!
//! - [`PixelFormat`] - Colour model of a pixel (grayscale, RGB, RGBA, ...)
//! - [`SampleFormat`] - Numeric type of each channel sample
//!
//! # Usage
//!
//! ```rust
//! use tiffnorm_core::{PixelFormat, SampleFormat};
//!
//! assert_eq!(PixelFormat::Rgba.channels(), Some(4));
//! assert!(SampleFormat::FloatingPoint.is_float());
//! ```

/// Colour model of the pixels stored in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// Single luminance channel.
    Y,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Luma and two chroma channels, not subsampled.
    YCbCr,
    /// CIE L*a*b*.
    CieLab,
    /// ICC L*a*b*.
    IccLab,
    /// Cyan, magenta, yellow, black.
    Cmyk,
    /// Not known or not representable.
    #[default]
    Unknown,
}

impl PixelFormat {
    /// Number of channels implied by the format, if fixed.
    #[inline]
    pub const fn channels(&self) -> Option<u16> {
        match self {
            Self::Y => Some(1),
            Self::Rgb | Self::YCbCr | Self::CieLab | Self::IccLab => Some(3),
            Self::Rgba | Self::Cmyk => Some(4),
            Self::Unknown => None,
        }
    }

    /// Whether the format carries an alpha channel.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Y => "Y",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::YCbCr => "YCbCr",
            Self::CieLab => "CIELab",
            Self::IccLab => "ICCLab",
            Self::Cmyk => "CMYK",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Numeric interpretation of each channel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// Unsigned integer samples.
    #[default]
    UnsignedInteger,
    /// Two's complement signed integer samples.
    SignedInteger,
    /// IEEE floating point samples.
    FloatingPoint,
    /// Not known.
    Unknown,
}

impl SampleFormat {
    /// Whether samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::FloatingPoint)
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UnsignedInteger => "uint",
            Self::SignedInteger => "int",
            Self::FloatingPoint => "float",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
