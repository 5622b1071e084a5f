//! Cross-checks files written and read here against the `tiff` crate's
//! own image encoder and decoder.

mod common;

use std::io::Cursor;

use common::pattern;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression as Codec, TiffEncoder, colortype};
use tiffnorm_core::{DynImage, MessageLog, PixelFormat};
use tiffnorm_io::{
    ChunkLayout, Compression, MemoryStream, WriteOptions, read_tiff, read_tiff_layout, write_tiff,
};

fn encode(image: &DynImage, options: &WriteOptions) -> Vec<u8> {
    let mut log = MessageLog::new();
    let mut file = MemoryStream::new();
    write_tiff(&mut file, &image.view(), options, &mut log).unwrap();
    file.into_inner()
}

fn decode(bytes: Vec<u8>) -> DynImage {
    let mut log = MessageLog::new();
    let mut out = DynImage::default();
    read_tiff(MemoryStream::from_vec(bytes), &mut out, &mut log).unwrap();
    out
}

#[test]
fn tiff_crate_reads_rgb8_strips() {
    let image = pattern(23, 11, 3, 1, PixelFormat::Rgb, 0);
    let options = WriteOptions {
        rows_per_strip: 3,
        ..Default::default()
    };
    let mut decoder = Decoder::new(Cursor::new(encode(&image, &options))).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (23, 11));
    assert_eq!(decoder.colortype().unwrap(), ColorType::RGB(8));
    let DecodingResult::U8(data) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit samples");
    };
    assert_eq!(data, image.data());
}

#[test]
fn tiff_crate_reads_gray16() {
    let image = pattern(7, 5, 1, 2, PixelFormat::Y, 3);
    let mut decoder = Decoder::new(Cursor::new(encode(&image, &WriteOptions::default()))).unwrap();
    assert_eq!(decoder.colortype().unwrap(), ColorType::Gray(16));
    let DecodingResult::U16(data) = decoder.read_image().unwrap() else {
        panic!("expected 16-bit samples");
    };
    let expected: Vec<u16> = image
        .data()
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(data, expected);
}

#[test]
fn tiff_crate_reads_gray8_tiles() {
    let image = pattern(40, 20, 1, 1, PixelFormat::Y, 5);
    let options = WriteOptions {
        layout: ChunkLayout::Tiles,
        tile_width: 16,
        tile_height: 16,
        ..Default::default()
    };
    let mut decoder = Decoder::new(Cursor::new(encode(&image, &options))).unwrap();
    let DecodingResult::U8(data) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit samples");
    };
    assert_eq!(data, image.data());
}

#[test]
fn reads_tiff_crate_rgb8() {
    let image = pattern(19, 13, 3, 1, PixelFormat::Rgb, 7);
    let mut bytes = Vec::new();
    TiffEncoder::new(Cursor::new(&mut bytes))
        .unwrap()
        .write_image::<colortype::RGB8>(19, 13, image.data())
        .unwrap();
    assert_eq!(decode(bytes), image);
}

#[test]
fn reads_tiff_crate_rgba16() {
    let image = pattern(6, 9, 4, 2, PixelFormat::Rgba, 11);
    let samples: Vec<u16> = image
        .data()
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect();
    let mut bytes = Vec::new();
    TiffEncoder::new(Cursor::new(&mut bytes))
        .unwrap()
        .write_image::<colortype::RGBA16>(6, 9, &samples)
        .unwrap();
    assert_eq!(decode(bytes), image);
}

#[test]
fn reads_tiff_crate_gray8() {
    let image = pattern(31, 4, 1, 1, PixelFormat::Y, 13);
    let mut bytes = Vec::new();
    TiffEncoder::new(Cursor::new(&mut bytes))
        .unwrap()
        .write_image::<colortype::Gray8>(31, 4, image.data())
        .unwrap();
    assert_eq!(decode(bytes), image);
}

#[test]
fn tiff_crate_reads_lzw_strips() {
    let image = pattern(17, 9, 3, 1, PixelFormat::Rgb, 2);
    let options = WriteOptions {
        compression: Compression::Lzw,
        rows_per_strip: 4,
        ..Default::default()
    };
    let mut decoder = Decoder::new(Cursor::new(encode(&image, &options))).unwrap();
    let DecodingResult::U8(data) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit samples");
    };
    assert_eq!(data, image.data());
}

#[test]
fn reads_tiff_crate_compressed() {
    let image = pattern(21, 10, 3, 1, PixelFormat::Rgb, 17);
    for (codec, expected) in [
        (Codec::Lzw, Compression::Lzw),
        (Codec::Deflate(DeflateLevel::Balanced), Compression::AdobeDeflate),
        (Codec::Packbits, Compression::PackBits),
    ] {
        let mut bytes = Vec::new();
        TiffEncoder::new(Cursor::new(&mut bytes))
            .unwrap()
            .with_compression(codec)
            .write_image::<colortype::RGB8>(21, 10, image.data())
            .unwrap();
        let info = read_tiff_layout(MemoryStream::from_vec(bytes.clone())).unwrap();
        assert_eq!(info.source.compression, expected);
        assert_eq!(decode(bytes), image);
    }
}
