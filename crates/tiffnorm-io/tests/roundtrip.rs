//! Write/read round trips through the `tiff`-backed reader and writer.

mod common;

use common::pattern;
use tiffnorm_core::{
    DynImage, DynImageView, DynImageViewMut, ImageSemantics, MessageLog, PixelFormat,
    SampleFormat, UntypedLayout,
};
use tiff::tags::Tag;
use tiffnorm_io::{
    ChunkLayout, ChunkReader, Chunking, Compression, MemoryStream, Photometric, TiffError,
    TiffReader, WriteOptions, read, read_tiff, read_tiff_layout, write, write_tiff,
};

fn roundtrip(view: &DynImageView<'_>, options: &WriteOptions) -> (DynImage, Vec<u8>) {
    let mut log = MessageLog::new();
    let mut file = MemoryStream::new();
    write_tiff(&mut file, view, options, &mut log).unwrap();
    let bytes = file.into_inner();

    let mut out = DynImage::default();
    read_tiff(MemoryStream::from_vec(bytes.clone()), &mut out, &mut log).unwrap();
    assert!(log.is_empty(), "unexpected diagnostics: {:?}", log.entries());
    (out, bytes)
}

#[test]
fn rgb8_many_strips() {
    let image = pattern(33, 17, 3, 1, PixelFormat::Rgb, 1);
    let options = WriteOptions {
        max_bytes_per_strip: 500,
        ..Default::default()
    };
    let (out, bytes) = roundtrip(&image.view(), &options);
    assert_eq!(out, image);

    let info = read_tiff_layout(MemoryStream::from_vec(bytes)).unwrap();
    let Chunking::Strips(strips) = info.chunking else {
        panic!("expected strips");
    };
    // 99-byte rows, 500-byte budget.
    assert_eq!(strips.rows_per_strip, 5);
    assert_eq!(strips.count, 4);
    assert_eq!(info.auxiliary.software.as_deref(), Some("tiffnorm"));
}

#[test]
fn rgba16_tiles_with_partial_edges() {
    let image = pattern(37, 21, 4, 2, PixelFormat::Rgba, 2);
    let options = WriteOptions {
        layout: ChunkLayout::Tiles,
        tile_width: 16,
        tile_height: 16,
        ..Default::default()
    };
    let (out, bytes) = roundtrip(&image.view(), &options);
    assert_eq!(out, image);

    let mut reader = TiffReader::new(MemoryStream::from_vec(bytes)).unwrap();
    assert_eq!(reader.chunk_count(), 3 * 2);
    assert_eq!(reader.source_layout().photometric, Photometric::Rgb);
    let decoder = reader.decoder();
    // Associated alpha.
    assert_eq!(
        decoder.find_tag_unsigned_vec::<u16>(Tag::ExtraSamples).unwrap(),
        Some(vec![1])
    );
    assert_eq!(
        decoder.find_tag_unsigned_vec::<u16>(Tag::BitsPerSample).unwrap(),
        Some(vec![16; 4])
    );
}

#[test]
fn strided_source_written_packed() {
    // 4x3 gray image inside rows of 7 bytes.
    let storage: Vec<u8> = (0..7 * 2 + 4).map(|i| i as u8).collect();
    let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
    let view = DynImageView::with_stride(&storage, UntypedLayout::new(4, 3, 1, 1), 7, semantics).unwrap();
    let options = WriteOptions {
        rows_per_strip: 2,
        ..Default::default()
    };
    let (out, _) = roundtrip(&view, &options);
    assert_eq!(out.data(), &[0, 1, 2, 3, 7, 8, 9, 10, 14, 15, 16, 17]);
}

#[test]
fn read_into_strided_destination() {
    let image = pattern(5, 4, 3, 1, PixelFormat::Rgb, 4);
    let mut log = MessageLog::new();
    let mut file = MemoryStream::new();
    write_tiff(&mut file, &image.view(), &WriteOptions::default(), &mut log).unwrap();

    let stride = 20;
    let mut storage = vec![0xFF; stride * 3 + 15];
    let semantics = ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger);
    let mut view =
        DynImageViewMut::with_stride(&mut storage, *image.layout(), stride, semantics).unwrap();
    read_tiff(MemoryStream::from_vec(file.into_inner()), &mut view, &mut log).unwrap();

    for y in 0..4 {
        assert_eq!(view.row(y), image.row(y));
    }
    assert_eq!(&storage[15..20], &[0xFF; 5]);
}

#[test]
fn gray16_file_on_disk() {
    let image = pattern(9, 6, 1, 2, PixelFormat::Y, 5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray16.tif");
    write(&path, &image.view(), &WriteOptions::default()).unwrap();
    let out = read(&path).unwrap();
    assert_eq!(out, image);
    assert_eq!(out.semantics().pixel_format, PixelFormat::Y);
}

#[test]
fn empty_image_not_written() {
    let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
    let image = DynImage::new(UntypedLayout::new(0, 0, 1, 1), semantics).unwrap();
    let mut log = MessageLog::new();
    let mut file = MemoryStream::new();
    let err = write_tiff(&mut file, &image.view(), &WriteOptions::default(), &mut log).unwrap_err();
    assert!(matches!(err, TiffError::UnsupportedSource(_)));
    assert_eq!(log.errors().count(), 1);
}

#[test]
fn compressed_strips() {
    let image = pattern(29, 14, 3, 1, PixelFormat::Rgb, 6);
    for compression in [Compression::Lzw, Compression::Deflate, Compression::PackBits] {
        let options = WriteOptions {
            compression,
            rows_per_strip: 4,
            ..Default::default()
        };
        let (out, bytes) = roundtrip(&image.view(), &options);
        assert_eq!(out, image, "{compression}");
        let info = read_tiff_layout(MemoryStream::from_vec(bytes)).unwrap();
        assert_eq!(info.source.compression, compression);
    }
}

#[test]
fn compressed_gray16_tiles() {
    let image = pattern(20, 18, 1, 2, PixelFormat::Y, 8);
    for compression in [Compression::Lzw, Compression::AdobeDeflate, Compression::PackBits] {
        let options = WriteOptions {
            compression,
            layout: ChunkLayout::Tiles,
            tile_width: 16,
            tile_height: 16,
            ..Default::default()
        };
        let (out, _) = roundtrip(&image.view(), &options);
        assert_eq!(out, image, "{compression}");
    }
}
