//! TIFF directory tag values.
//!
//! Typed views of the enumerated TIFF fields that decide how pixel bytes
//! are laid out. Every enum keeps unrecognized codes in an `Unknown`
//! variant so a directory can always be described, even when it cannot be
//! normalized.
//!
//! | Enum | TIFF tag |
//! |------|----------|
//! | [`PlanarConfig`] | PlanarConfiguration (284) |
//! | [`Photometric`] | PhotometricInterpretation (262) |
//! | [`TiffSampleFormat`] | SampleFormat (339) |
//! | [`Compression`] | Compression (259) |
//! | [`Orientation`] | Orientation (274) |

use tiffnorm_core::{PixelFormat, SampleFormat};

// === Planar configuration ===

/// How channel samples are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanarConfig {
    /// Interleaved (chunky) samples.
    #[default]
    Contiguous,
    /// One plane per channel.
    Separate,
    /// Unrecognized code.
    Unknown(u16),
}

impl PlanarConfig {
    /// Decodes a tag value.
    pub const fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::Contiguous,
            2 => Self::Separate,
            other => Self::Unknown(other),
        }
    }

    /// Encodes to a tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Contiguous => 1,
            Self::Separate => 2,
            Self::Unknown(v) => v,
        }
    }
}

impl std::fmt::Display for PlanarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contiguous => write!(f, "contiguous"),
            Self::Separate => write!(f, "separate"),
            Self::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

// === Photometric interpretation ===

/// Colour model of the stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Photometric {
    /// Grayscale, 0 is white.
    MinIsWhite,
    /// Grayscale, 0 is black.
    #[default]
    MinIsBlack,
    /// RGB, optionally with extra samples.
    Rgb,
    /// Colour-mapped indices.
    Palette,
    /// Transparency mask.
    Mask,
    /// Separated ink channels (usually CMYK).
    Separated,
    /// Luma and chroma.
    YCbCr,
    /// CIE L*a*b*.
    CieLab,
    /// ICC L*a*b*.
    IccLab,
    /// ITU L*a*b*.
    ItuLab,
    /// Colour filter array.
    Cfa,
    /// Pixar LogL.
    LogL,
    /// Pixar LogLuv.
    LogLuv,
    /// Unrecognized code.
    Unknown(u16),
}

impl Photometric {
    /// Decodes a tag value.
    pub const fn from_u16(v: u16) -> Self {
        match v {
            0 => Self::MinIsWhite,
            1 => Self::MinIsBlack,
            2 => Self::Rgb,
            3 => Self::Palette,
            4 => Self::Mask,
            5 => Self::Separated,
            6 => Self::YCbCr,
            8 => Self::CieLab,
            9 => Self::IccLab,
            10 => Self::ItuLab,
            32803 => Self::Cfa,
            32844 => Self::LogL,
            32845 => Self::LogLuv,
            other => Self::Unknown(other),
        }
    }

    /// Encodes to a tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::MinIsWhite => 0,
            Self::MinIsBlack => 1,
            Self::Rgb => 2,
            Self::Palette => 3,
            Self::Mask => 4,
            Self::Separated => 5,
            Self::YCbCr => 6,
            Self::CieLab => 8,
            Self::IccLab => 9,
            Self::ItuLab => 10,
            Self::Cfa => 32803,
            Self::LogL => 32844,
            Self::LogLuv => 32845,
            Self::Unknown(v) => v,
        }
    }

    /// Pixel format of data stored with this interpretation.
    ///
    /// The channel count must match the model, otherwise the result is
    /// [`PixelFormat::Unknown`].
    pub const fn to_pixel_format(self, samples_per_pixel: u16) -> PixelFormat {
        match (self, samples_per_pixel) {
            (Self::MinIsWhite | Self::MinIsBlack, 1) => PixelFormat::Y,
            (Self::Rgb, 3) => PixelFormat::Rgb,
            (Self::Rgb, 4) => PixelFormat::Rgba,
            (Self::Separated, 4) => PixelFormat::Cmyk,
            (Self::YCbCr, 3) => PixelFormat::YCbCr,
            (Self::CieLab, 3) => PixelFormat::CieLab,
            (Self::IccLab, 3) => PixelFormat::IccLab,
            _ => PixelFormat::Unknown,
        }
    }

    /// Interpretation used when writing a buffer of the given format.
    pub const fn from_pixel_format(format: PixelFormat) -> Option<Self> {
        match format {
            PixelFormat::Y => Some(Self::MinIsBlack),
            PixelFormat::Rgb | PixelFormat::Rgba => Some(Self::Rgb),
            PixelFormat::YCbCr => Some(Self::YCbCr),
            PixelFormat::CieLab => Some(Self::CieLab),
            PixelFormat::IccLab => Some(Self::IccLab),
            PixelFormat::Cmyk | PixelFormat::Unknown => None,
        }
    }
}

impl std::fmt::Display for Photometric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MinIsWhite => "MinIsWhite",
            Self::MinIsBlack => "MinIsBlack",
            Self::Rgb => "RGB",
            Self::Palette => "Palette",
            Self::Mask => "Mask",
            Self::Separated => "Separated",
            Self::YCbCr => "YCbCr",
            Self::CieLab => "CIELab",
            Self::IccLab => "ICCLab",
            Self::ItuLab => "ITULab",
            Self::Cfa => "CFA",
            Self::LogL => "LogL",
            Self::LogLuv => "LogLuv",
            Self::Unknown(v) => return write!(f, "unknown ({v})"),
        };
        f.write_str(name)
    }
}

// === Sample format ===

/// Numeric type of stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TiffSampleFormat {
    /// Unsigned integer.
    #[default]
    UnsignedInt,
    /// Signed integer.
    Int,
    /// IEEE floating point.
    Float,
    /// Undefined.
    Void,
    /// Complex integer.
    ComplexInt,
    /// Complex floating point.
    ComplexFloat,
    /// Unrecognized code.
    Unknown(u16),
}

impl TiffSampleFormat {
    /// Decodes a tag value.
    pub const fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::UnsignedInt,
            2 => Self::Int,
            3 => Self::Float,
            4 => Self::Void,
            5 => Self::ComplexInt,
            6 => Self::ComplexFloat,
            other => Self::Unknown(other),
        }
    }

    /// Encodes to a tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::UnsignedInt => 1,
            Self::Int => 2,
            Self::Float => 3,
            Self::Void => 4,
            Self::ComplexInt => 5,
            Self::ComplexFloat => 6,
            Self::Unknown(v) => v,
        }
    }

    /// Buffer sample tag for this format.
    pub const fn to_sample_format(self) -> SampleFormat {
        match self {
            Self::UnsignedInt => SampleFormat::UnsignedInteger,
            Self::Int => SampleFormat::SignedInteger,
            Self::Float => SampleFormat::FloatingPoint,
            _ => SampleFormat::Unknown,
        }
    }

    /// Container sample format for a buffer sample tag.
    pub const fn from_sample_format(format: SampleFormat) -> Self {
        match format {
            SampleFormat::UnsignedInteger => Self::UnsignedInt,
            SampleFormat::SignedInteger => Self::Int,
            SampleFormat::FloatingPoint => Self::Float,
            SampleFormat::Unknown => Self::Void,
        }
    }
}

impl std::fmt::Display for TiffSampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UnsignedInt => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::Void => "void",
            Self::ComplexInt => "complex int",
            Self::ComplexFloat => "complex float",
            Self::Unknown(v) => return write!(f, "unknown ({v})"),
        };
        f.write_str(name)
    }
}

// === Compression ===

/// Chunk compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Uncompressed.
    #[default]
    None,
    /// CCITT modified Huffman RLE.
    CcittRle,
    /// CCITT Group 3 fax.
    CcittFax3,
    /// CCITT Group 4 fax.
    CcittFax4,
    /// Lempel-Ziv-Welch.
    Lzw,
    /// Old-style JPEG.
    OJpeg,
    /// JPEG (TIFF technical note 2).
    Jpeg,
    /// NeXT 2-bit RLE.
    Next,
    /// CCITT RLE, word aligned.
    CcittRlew,
    /// Macintosh PackBits.
    PackBits,
    /// ThunderScan RLE.
    ThunderScan,
    /// IT8 CT with padding.
    It8CtPad,
    /// IT8 linework RLE.
    It8Lw,
    /// IT8 monochrome picture.
    It8Mp,
    /// IT8 binary line art.
    It8Bl,
    /// Pixar log.
    PixarLog,
    /// Deflate (zlib).
    Deflate,
    /// Adobe-registered Deflate.
    AdobeDeflate,
    /// JBIG.
    Jbig,
    /// LZMA2.
    Lzma,
    /// Zstandard.
    Zstd,
    /// WebP.
    Webp,
    /// Unrecognized code.
    Unknown(u16),
}

impl Compression {
    /// Decodes a tag value.
    pub const fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::None,
            2 => Self::CcittRle,
            3 => Self::CcittFax3,
            4 => Self::CcittFax4,
            5 => Self::Lzw,
            6 => Self::OJpeg,
            7 => Self::Jpeg,
            8 => Self::AdobeDeflate,
            32766 => Self::Next,
            32771 => Self::CcittRlew,
            32773 => Self::PackBits,
            32809 => Self::ThunderScan,
            32895 => Self::It8CtPad,
            32896 => Self::It8Lw,
            32897 => Self::It8Mp,
            32898 => Self::It8Bl,
            32909 => Self::PixarLog,
            32946 => Self::Deflate,
            34661 => Self::Jbig,
            34925 => Self::Lzma,
            50000 => Self::Zstd,
            50001 => Self::Webp,
            other => Self::Unknown(other),
        }
    }

    /// Encodes to a tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::None => 1,
            Self::CcittRle => 2,
            Self::CcittFax3 => 3,
            Self::CcittFax4 => 4,
            Self::Lzw => 5,
            Self::OJpeg => 6,
            Self::Jpeg => 7,
            Self::AdobeDeflate => 8,
            Self::Next => 32766,
            Self::CcittRlew => 32771,
            Self::PackBits => 32773,
            Self::ThunderScan => 32809,
            Self::It8CtPad => 32895,
            Self::It8Lw => 32896,
            Self::It8Mp => 32897,
            Self::It8Bl => 32898,
            Self::PixarLog => 32909,
            Self::Deflate => 32946,
            Self::Jbig => 34661,
            Self::Lzma => 34925,
            Self::Zstd => 50000,
            Self::Webp => 50001,
            Self::Unknown(v) => v,
        }
    }

    /// Whether strips must hold a multiple of 8 rows (8x8 block codecs).
    #[inline]
    pub const fn requires_block_alignment(self) -> bool {
        matches!(self, Self::Jpeg | Self::OJpeg)
    }

    /// Short name for display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CcittRle => "CCITT RLE",
            Self::CcittFax3 => "CCITT Fax3",
            Self::CcittFax4 => "CCITT Fax4",
            Self::Lzw => "LZW",
            Self::OJpeg => "old JPEG",
            Self::Jpeg => "JPEG",
            Self::Next => "NeXT",
            Self::CcittRlew => "CCITT RLEW",
            Self::PackBits => "PackBits",
            Self::ThunderScan => "ThunderScan",
            Self::It8CtPad => "IT8 CT pad",
            Self::It8Lw => "IT8 LW",
            Self::It8Mp => "IT8 MP",
            Self::It8Bl => "IT8 BL",
            Self::PixarLog => "PixarLog",
            Self::Deflate => "Deflate",
            Self::AdobeDeflate => "Adobe Deflate",
            Self::Jbig => "JBIG",
            Self::Lzma => "LZMA",
            Self::Zstd => "Zstd",
            Self::Webp => "WebP",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(v) => write!(f, "unknown ({v})"),
            other => f.write_str(other.name()),
        }
    }
}

// === Orientation ===

/// Placement of the first stored row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Row 0 top, column 0 left.
    #[default]
    TopLeft,
    /// Row 0 top, column 0 right.
    TopRight,
    /// Row 0 bottom, column 0 right.
    BottomRight,
    /// Row 0 bottom, column 0 left.
    BottomLeft,
    /// Row 0 left, column 0 top.
    LeftTop,
    /// Row 0 right, column 0 top.
    RightTop,
    /// Row 0 right, column 0 bottom.
    RightBottom,
    /// Row 0 left, column 0 bottom.
    LeftBottom,
    /// Unrecognized code.
    Unknown(u16),
}

impl Orientation {
    /// Decodes a tag value.
    pub const fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::TopLeft,
            2 => Self::TopRight,
            3 => Self::BottomRight,
            4 => Self::BottomLeft,
            5 => Self::LeftTop,
            6 => Self::RightTop,
            7 => Self::RightBottom,
            8 => Self::LeftBottom,
            other => Self::Unknown(other),
        }
    }

    /// Encodes to a tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::TopLeft => 1,
            Self::TopRight => 2,
            Self::BottomRight => 3,
            Self::BottomLeft => 4,
            Self::LeftTop => 5,
            Self::RightTop => 6,
            Self::RightBottom => 7,
            Self::LeftBottom => 8,
            Self::Unknown(v) => v,
        }
    }
}
