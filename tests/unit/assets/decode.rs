use std::io::Cursor;

use super::*;
use crate::foundation::core::THUMBNAIL_CANVAS;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_jpeg_is_opaque() {
    let img = image::RgbImage::from_pixel(8, 4, image::Rgb([10, 200, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();

    let bg = decode_background(&buf, THUMBNAIL_CANVAS).unwrap();
    assert_eq!((bg.width, bg.height), (8, 4));
    assert!(bg.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_background(b"not an image", THUMBNAIL_CANVAS).is_err());
    assert!(decode_background(&[], THUMBNAIL_CANVAS).is_err());
}

#[test]
fn svg_is_rasterized_to_cover_the_frame() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="9">
        <rect width="16" height="9" fill="#ff0000"/>
    </svg>"##;
    assert!(looks_like_svg(svg));

    let bg = decode_background(svg, THUMBNAIL_CANVAS).unwrap();
    assert_eq!((bg.width, bg.height), (1280, 720));
    let center = ((360 * 1280 + 640) * 4) as usize;
    assert_eq!(&bg.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn malformed_svg_is_an_error() {
    assert!(decode_background(b"<svg", THUMBNAIL_CANVAS).is_err());
}

#[test]
fn straight_rgba_constructor_validates_length_and_dims() {
    assert!(Background::from_straight_rgba8(0, 1, vec![]).is_err());
    assert!(Background::from_straight_rgba8(2, 2, vec![0; 15]).is_err());
    let bg = Background::from_straight_rgba8(1, 1, vec![255, 255, 255, 0]).unwrap();
    assert_eq!(bg.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}
