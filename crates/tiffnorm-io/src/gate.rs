//! Suitability checks run before any pixel is moved.

use tiffnorm_core::{Diagnostics, PixelFormat};

use crate::{OutputLayout, SourceLayout, TiffError, TiffResult};

/// Bit depths the transfer routines can normalize.
pub const SUPPORTED_BITS: [u16; 4] = [1, 4, 8, 16];

/// Rejects directories that cannot be normalized.
///
/// On rejection an error is appended to `log` and
/// [`TiffError::UnsupportedSource`] is returned. Nothing else is touched.
pub fn check_suitability(src: &SourceLayout, log: &mut dyn Diagnostics) -> TiffResult<()> {
    match rejection(src) {
        None => Ok(()),
        Some(reason) => {
            log.error(format!("TIFF reader: {reason}"));
            Err(TiffError::UnsupportedSource(reason))
        }
    }
}

fn rejection(src: &SourceLayout) -> Option<String> {
    if src.depth != 1 {
        return Some(format!("Image depth {} unsupported (volumetric data)", src.depth));
    }
    if src.is_palette() {
        return Some("Palette images unsupported".into());
    }
    let eight_bit_triplet = src.samples_per_pixel == 3 && src.bits_per_sample == 8;
    if src.is_ycbcr() && !eight_bit_triplet {
        return Some(format!(
            "YCbCr data layout is unsupported ({} samples, {} bits)",
            src.samples_per_pixel, src.bits_per_sample
        ));
    }
    if src.is_lab() && !eight_bit_triplet {
        return Some(format!(
            "Lab data layout is unsupported ({} samples, {} bits)",
            src.samples_per_pixel, src.bits_per_sample
        ));
    }
    if src.is_planar() && (src.is_ycbcr() || src.is_lab()) {
        let model = if src.is_ycbcr() { "YCbCr" } else { "Lab" };
        return Some(format!(
            "Cannot read TIFF image with the following properties: planar, {model} (not implemented)"
        ));
    }
    if !SUPPORTED_BITS.contains(&src.bits_per_sample) {
        return Some(format!(
            "Bit depth {} unsupported (bits per sample have to be: 1, 4, 8 or 16)",
            src.bits_per_sample
        ));
    }
    let format = OutputLayout::derive(src).pixel_format;
    if !matches!(
        format,
        PixelFormat::Y | PixelFormat::Rgb | PixelFormat::Rgba | PixelFormat::YCbCr
    ) {
        return Some(format!(
            "Photometric tag '{}' with {} samples unsupported (has to be one of: grayscale, RGB(A), YCbCr)",
            src.photometric, src.samples_per_pixel
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{Photometric, PlanarConfig};
    use tiffnorm_core::{MessageLog, Severity};

    fn rgb8() -> SourceLayout {
        SourceLayout {
            width: 4,
            height: 4,
            samples_per_pixel: 3,
            bits_per_sample: 8,
            photometric: Photometric::Rgb,
            ..Default::default()
        }
    }

    fn rejected(src: SourceLayout) -> bool {
        let mut log = MessageLog::new();
        let result = check_suitability(&src, &mut log);
        if result.is_err() {
            assert_eq!(log.len(), 1);
            assert_eq!(log.entries()[0].severity, Severity::Error);
        } else {
            assert!(log.is_empty());
        }
        matches!(result, Err(TiffError::UnsupportedSource(_)))
    }

    #[test]
    fn test_accepts_common_layouts() {
        assert!(!rejected(rgb8()));
        assert!(!rejected(SourceLayout { samples_per_pixel: 4, ..rgb8() }));
        assert!(!rejected(SourceLayout { bits_per_sample: 16, ..rgb8() }));
        assert!(!rejected(SourceLayout::default()));
        assert!(!rejected(SourceLayout {
            photometric: Photometric::MinIsWhite,
            samples_per_pixel: 1,
            bits_per_sample: 4,
            ..rgb8()
        }));
        assert!(!rejected(SourceLayout { photometric: Photometric::YCbCr, ..rgb8() }));
        assert!(!rejected(SourceLayout { photometric: Photometric::CieLab, ..rgb8() }));
    }

    #[test]
    fn test_rejections() {
        assert!(rejected(SourceLayout { depth: 4, ..rgb8() }));
        assert!(rejected(SourceLayout {
            photometric: Photometric::Palette,
            samples_per_pixel: 1,
            ..rgb8()
        }));
        assert!(rejected(SourceLayout {
            photometric: Photometric::YCbCr,
            bits_per_sample: 16,
            ..rgb8()
        }));
        assert!(rejected(SourceLayout {
            photometric: Photometric::CieLab,
            samples_per_pixel: 4,
            ..rgb8()
        }));
        assert!(rejected(SourceLayout { bits_per_sample: 12, ..rgb8() }));
        assert!(rejected(SourceLayout { bits_per_sample: 32, ..rgb8() }));
        assert!(rejected(SourceLayout {
            photometric: Photometric::Separated,
            samples_per_pixel: 4,
            ..rgb8()
        }));
        assert!(rejected(SourceLayout { samples_per_pixel: 2, ..rgb8() }));
    }

    #[test]
    fn test_planar_color_conversion_rejected() {
        for photometric in [Photometric::YCbCr, Photometric::CieLab] {
            assert!(rejected(SourceLayout {
                photometric,
                planar_config: PlanarConfig::Separate,
                ..rgb8()
            }));
        }
        assert!(!rejected(SourceLayout {
            planar_config: PlanarConfig::Separate,
            ..rgb8()
        }));
    }
}
