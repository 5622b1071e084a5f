//! Normalized byte-level image buffers.
//!
//! This module provides the destination/source store for pixel transfer:
//! - [`DynImage`] - Owned, resizable buffer (always tightly packed)
//! - [`DynImageView`] - Immutable borrowed view, optionally strided
//! - [`DynImageViewMut`] - Mutable borrowed view, fixed size, optionally strided
//! - [`ImageTarget`] - Layout negotiation implemented by writable buffers
//!
//! # Memory Layout
//!
//! Pixels are interleaved and stored row-major, top to bottom. 16-bit
//! samples are kept in native byte order. A row of `row_bytes()` bytes
//! starts every `stride` bytes; the stride may exceed the row size when a
//! view borrows a sub-region of a larger allocation.
//!
//! ```text
//! Memory: [R G B R G B ... pad]  <- Row 0  (stride bytes)
//!         [R G B R G B ... pad]  <- Row 1
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tiffnorm_core::{DynImage, ImageSemantics, PixelFormat, SampleFormat, UntypedLayout};
//!
//! let layout = UntypedLayout::new(4, 2, 3, 1);
//! let semantics = ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger);
//! let mut img = DynImage::new(layout, semantics).unwrap();
//! img.row_mut(1)[0] = 255;
//! assert_eq!(img.row(1)[0], 255);
//! ```

use crate::{Error, ImageSemantics, Result, UntypedLayout};

/// Destination buffer capable of accepting a normalized layout.
///
/// Readers call [`prepare`](Self::prepare) exactly once before moving any
/// bytes. An owned buffer resizes itself; a borrowed buffer accepts only the
/// layout it already has.
pub trait ImageTarget {
    /// Resizes or validates the buffer for `layout`.
    ///
    /// Returns `false` when the buffer cannot take the layout.
    fn prepare(&mut self, layout: &UntypedLayout, semantics: ImageSemantics) -> bool;

    /// Mutable view over the prepared buffer.
    fn view_mut(&mut self) -> DynImageViewMut<'_>;
}

/// Minimum storage needed for `height` rows of `row_bytes` spaced by `stride`.
#[inline]
fn required_len(layout: &UntypedLayout, stride: usize) -> usize {
    match layout.height {
        0 => 0,
        h => stride * (h as usize - 1) + layout.row_bytes(),
    }
}

fn check_storage(layout: &UntypedLayout, stride: usize, len: usize) -> Result<()> {
    layout.validate()?;
    let row_bytes = layout.row_bytes();
    if stride < row_bytes {
        return Err(Error::InvalidStride { stride, row_bytes });
    }
    let required = required_len(layout, stride);
    if len < required {
        return Err(Error::BufferTooSmall {
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Owned, tightly packed image buffer.
///
/// # Example
///
/// ```rust
/// use tiffnorm_core::{DynImage, ImageTarget, ImageSemantics, UntypedLayout};
///
/// let mut img = DynImage::default();
/// assert!(img.prepare(&UntypedLayout::new(8, 8, 1, 2), ImageSemantics::default()));
/// assert_eq!(img.data().len(), 8 * 8 * 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DynImage {
    data: Vec<u8>,
    layout: UntypedLayout,
    semantics: ImageSemantics,
}

impl DynImage {
    /// Creates a zero-filled image.
    pub fn new(layout: UntypedLayout, semantics: ImageSemantics) -> Result<Self> {
        layout.validate()?;
        Ok(Self {
            data: vec![0; layout.byte_size()],
            layout,
            semantics,
        })
    }

    /// Wraps existing packed data.
    pub fn from_data(
        layout: UntypedLayout,
        semantics: ImageSemantics,
        data: Vec<u8>,
    ) -> Result<Self> {
        check_storage(&layout, layout.row_bytes(), data.len())?;
        Ok(Self {
            data,
            layout,
            semantics,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.layout.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> u16 {
        self.layout.channels
    }

    /// Bytes per channel sample.
    #[inline]
    pub fn bytes_per_channel(&self) -> u16 {
        self.layout.bytes_per_channel
    }

    /// Buffer layout.
    #[inline]
    pub fn layout(&self) -> &UntypedLayout {
        &self.layout
    }

    /// Colour and sample tags.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Bytes per row (always equal to [`row_bytes`](Self::row_bytes)).
    #[inline]
    pub fn stride(&self) -> usize {
        self.layout.row_bytes()
    }

    /// Bytes of pixel data per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.layout.row_bytes()
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let rb = self.row_bytes();
        let start = y as usize * rb;
        &self.data[start..start + rb]
    }

    /// Returns row `y` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let rb = self.row_bytes();
        let start = y as usize * rb;
        &mut self.data[start..start + rb]
    }

    /// Borrows the whole image.
    pub fn view(&self) -> DynImageView<'_> {
        DynImageView {
            data: &self.data,
            layout: self.layout,
            stride: self.layout.row_bytes(),
            semantics: self.semantics,
        }
    }
}

impl ImageTarget for DynImage {
    fn prepare(&mut self, layout: &UntypedLayout, semantics: ImageSemantics) -> bool {
        if layout.validate().is_err() {
            return false;
        }
        self.data.clear();
        self.data.resize(layout.byte_size(), 0);
        self.layout = *layout;
        self.semantics = semantics;
        true
    }

    fn view_mut(&mut self) -> DynImageViewMut<'_> {
        DynImageViewMut {
            stride: self.layout.row_bytes(),
            data: &mut self.data[..],
            layout: self.layout,
            semantics: self.semantics,
        }
    }
}

impl std::fmt::Debug for DynImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynImage")
            .field("layout", &self.layout)
            .field("semantics", &self.semantics)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Immutable view into pixel bytes.
#[derive(Clone, Copy)]
pub struct DynImageView<'a> {
    data: &'a [u8],
    layout: UntypedLayout,
    stride: usize,
    semantics: ImageSemantics,
}

impl<'a> DynImageView<'a> {
    /// Creates a tightly packed view.
    pub fn new(data: &'a [u8], layout: UntypedLayout, semantics: ImageSemantics) -> Result<Self> {
        Self::with_stride(data, layout, layout.row_bytes(), semantics)
    }

    /// Creates a view whose rows start every `stride` bytes.
    pub fn with_stride(
        data: &'a [u8],
        layout: UntypedLayout,
        stride: usize,
        semantics: ImageSemantics,
    ) -> Result<Self> {
        check_storage(&layout, stride, data.len())?;
        Ok(Self {
            data,
            layout,
            stride,
            semantics,
        })
    }

    /// View width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.layout.width
    }

    /// View height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Layout of the viewed pixels.
    #[inline]
    pub fn layout(&self) -> &UntypedLayout {
        &self.layout
    }

    /// Colour and sample tags.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Distance between row starts in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes of pixel data per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.layout.row_bytes()
    }

    /// Whether rows follow each other without padding.
    #[inline]
    pub fn is_packed(&self) -> bool {
        self.stride == self.layout.row_bytes()
    }

    /// Returns row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.layout.row_bytes()]
    }

    /// Returns `count` consecutive packed rows starting at `y`, or `None`
    /// when the view is strided.
    pub fn packed_rows(&self, y: u32, count: u32) -> Option<&'a [u8]> {
        if !self.is_packed() || y.checked_add(count)? > self.layout.height {
            return None;
        }
        let rb = self.layout.row_bytes();
        let start = y as usize * rb;
        Some(&self.data[start..start + count as usize * rb])
    }
}

impl std::fmt::Debug for DynImageView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynImageView")
            .field("layout", &self.layout)
            .field("stride", &self.stride)
            .field("semantics", &self.semantics)
            .finish()
    }
}

/// Mutable, fixed-size view into pixel bytes.
///
/// Implements [`ImageTarget`] by accepting only its current shape, which
/// lets a reader decode straight into caller-owned memory.
///
/// # Example
///
/// ```rust
/// use tiffnorm_core::{DynImageViewMut, ImageSemantics, ImageTarget, UntypedLayout};
///
/// let mut storage = vec![0u8; 2 * 16];
/// let layout = UntypedLayout::new(4, 2, 3, 1);
/// let mut view =
///     DynImageViewMut::with_stride(&mut storage, layout, 16, ImageSemantics::default()).unwrap();
/// assert!(view.prepare(&layout, ImageSemantics::default()));
/// assert!(!view.prepare(&UntypedLayout::new(4, 2, 4, 1), ImageSemantics::default()));
/// ```
pub struct DynImageViewMut<'a> {
    data: &'a mut [u8],
    layout: UntypedLayout,
    stride: usize,
    semantics: ImageSemantics,
}

impl<'a> DynImageViewMut<'a> {
    /// Creates a tightly packed mutable view.
    pub fn new(
        data: &'a mut [u8],
        layout: UntypedLayout,
        semantics: ImageSemantics,
    ) -> Result<Self> {
        Self::with_stride(data, layout, layout.row_bytes(), semantics)
    }

    /// Creates a mutable view whose rows start every `stride` bytes.
    pub fn with_stride(
        data: &'a mut [u8],
        layout: UntypedLayout,
        stride: usize,
        semantics: ImageSemantics,
    ) -> Result<Self> {
        check_storage(&layout, stride, data.len())?;
        Ok(Self {
            data,
            layout,
            stride,
            semantics,
        })
    }

    /// View width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.layout.width
    }

    /// View height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Layout of the viewed pixels.
    #[inline]
    pub fn layout(&self) -> &UntypedLayout {
        &self.layout
    }

    /// Colour and sample tags.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Distance between row starts in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes of pixel data per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.layout.row_bytes()
    }

    /// Returns row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.layout.row_bytes()]
    }

    /// Returns row `y` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.layout.row_bytes();
        &mut self.data[start..end]
    }

    /// Reborrows as an immutable view.
    pub fn as_view(&self) -> DynImageView<'_> {
        DynImageView {
            data: &*self.data,
            layout: self.layout,
            stride: self.stride,
            semantics: self.semantics,
        }
    }
}

impl ImageTarget for DynImageViewMut<'_> {
    fn prepare(&mut self, layout: &UntypedLayout, semantics: ImageSemantics) -> bool {
        if *layout != self.layout {
            return false;
        }
        self.semantics = semantics;
        true
    }

    fn view_mut(&mut self) -> DynImageViewMut<'_> {
        DynImageViewMut {
            data: &mut *self.data,
            layout: self.layout,
            stride: self.stride,
            semantics: self.semantics,
        }
    }
}

impl std::fmt::Debug for DynImageViewMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynImageViewMut")
            .field("layout", &self.layout)
            .field("stride", &self.stride)
            .field("semantics", &self.semantics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelFormat, SampleFormat};

    fn rgb8() -> ImageSemantics {
        ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger)
    }

    #[test]
    fn test_new_is_zeroed() {
        let img = DynImage::new(UntypedLayout::new(3, 2, 3, 1), rgb8()).unwrap();
        assert_eq!(img.data().len(), 18);
        assert!(img.data().iter().all(|&b| b == 0));
        assert_eq!(img.stride(), 9);
    }

    #[test]
    fn test_from_data_size_check() {
        let layout = UntypedLayout::new(2, 2, 1, 1);
        assert!(DynImage::from_data(layout, rgb8(), vec![0; 3]).is_err());
        assert!(DynImage::from_data(layout, rgb8(), vec![0; 4]).is_ok());
    }

    #[test]
    fn test_prepare_resizes_owned() {
        let mut img = DynImage::default();
        let layout = UntypedLayout::new(5, 3, 4, 2);
        assert!(img.prepare(&layout, rgb8()));
        assert_eq!(img.layout(), &layout);
        assert_eq!(img.data().len(), 5 * 3 * 8);
        assert!(!img.prepare(&UntypedLayout::new(5, 3, 0, 1), rgb8()));
    }

    #[test]
    fn test_strided_view_rows() {
        let mut storage: Vec<u8> = (0..30).collect();
        let layout = UntypedLayout::new(2, 3, 3, 1);
        let mut view = DynImageViewMut::with_stride(&mut storage, layout, 10, rgb8()).unwrap();
        assert_eq!(view.row(1), &[10, 11, 12, 13, 14, 15]);
        view.row_mut(2).fill(0xAA);
        assert_eq!(storage[20..26], [0xAA; 6]);
        assert_eq!(storage[26], 26);
    }

    #[test]
    fn test_stride_validation() {
        let mut storage = vec![0u8; 100];
        let layout = UntypedLayout::new(4, 4, 3, 1);
        assert!(matches!(
            DynImageViewMut::with_stride(&mut storage, layout, 8, rgb8()),
            Err(Error::InvalidStride { .. })
        ));
        assert!(matches!(
            DynImageViewMut::with_stride(&mut storage, layout, 40, rgb8()),
            Err(Error::BufferTooSmall { .. })
        ));
        // Last row does not need a full stride.
        assert!(DynImageViewMut::with_stride(&mut storage, layout, 29, rgb8()).is_ok());
    }

    #[test]
    fn test_view_mut_rejects_other_layout() {
        let mut storage = vec![0u8; 12];
        let layout = UntypedLayout::new(2, 2, 3, 1);
        let mut view = DynImageViewMut::new(&mut storage, layout, rgb8()).unwrap();
        assert!(!view.prepare(&UntypedLayout::new(2, 2, 1, 1), rgb8()));
        assert!(view.prepare(&layout, ImageSemantics::new(PixelFormat::YCbCr, SampleFormat::UnsignedInteger)));
        assert_eq!(view.semantics().pixel_format, PixelFormat::YCbCr);
    }

    #[test]
    fn test_packed_rows() {
        let img = DynImage::from_data(UntypedLayout::new(2, 3, 1, 1), rgb8(), (0..6).collect()).unwrap();
        let view = img.view();
        assert_eq!(view.packed_rows(1, 2), Some(&[2u8, 3, 4, 5][..]));
        assert_eq!(view.packed_rows(2, 2), None);

        let storage = [0u8; 8];
        let strided =
            DynImageView::with_stride(&storage, UntypedLayout::new(2, 2, 1, 1), 4, rgb8()).unwrap();
        assert!(!strided.is_packed());
        assert_eq!(strided.packed_rows(0, 1), None);
    }
}
