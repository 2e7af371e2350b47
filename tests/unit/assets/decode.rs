use std::io::Cursor;

use super::*;

fn encode_png(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn translucent_pixels_keep_straight_color() {
    let buf = encode_png(1, 1, vec![100, 50, 200, 128]);
    let prepared = decode_frame(1, &buf).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(prepared.rgba8.as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn rgb_input_gains_opaque_alpha() {
    let img = image::RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let prepared = decode_frame(1, &buf).unwrap();
    assert_eq!(
        prepared.rgba8.as_slice(),
        &[10, 20, 30, 255, 40, 50, 60, 255]
    );
}

#[test]
fn garbage_bytes_report_the_frame_number() {
    let err = decode_frame(17, b"not an image").unwrap_err();
    assert_eq!(err.frame_number(), Some(17));
}
