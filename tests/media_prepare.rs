use std::io::Cursor;

use tempfile::TempDir;

use rolodex::media::{prepare_picked, prepare_picked_async, FileImageSource};

/// Encodes a flat-color JPEG and splices in an EXIF APP1 segment carrying
/// the given orientation tag, right after the SOI marker.
fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([120, 40, 200]),
    ));
    let mut jpeg = Vec::new();
    img.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .expect("encode fixture");

    // APP1 marker, length 34: "Exif\0\0" + little-endian TIFF header + one
    // IFD entry (tag 0x0112 Orientation, SHORT, count 1).
    let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
    app1.extend_from_slice(&1u16.to_le_bytes());
    app1.extend_from_slice(&0x0112u16.to_le_bytes());
    app1.extend_from_slice(&3u16.to_le_bytes());
    app1.extend_from_slice(&1u32.to_le_bytes());
    app1.extend_from_slice(&orientation.to_le_bytes());
    app1.extend_from_slice(&[0, 0]);
    app1.extend_from_slice(&0u32.to_le_bytes());

    let mut out = Vec::with_capacity(jpeg.len() + app1.len());
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .expect("guess format")
        .decode()
        .expect("decode output");
    (img.width(), img.height())
}

#[test]
fn unopenable_reference_yields_no_image() {
    let source = FileImageSource::new("/nonexistent/picked.jpg");
    let out = prepare_picked(&source).expect("prepare");
    assert_eq!(out, None);
}

#[test]
fn rotate_90_tag_swaps_width_and_height() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(10, 20, 6)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(decoded_dimensions(&out), (20, 10));
}

#[test]
fn rotate_180_tag_keeps_dimensions() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(10, 20, 3)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(decoded_dimensions(&out), (10, 20));
}

#[test]
fn rotate_270_tag_swaps_width_and_height() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(10, 20, 8)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(decoded_dimensions(&out), (20, 10));
}

#[test]
fn mirrored_orientation_passes_through() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(10, 20, 2)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(decoded_dimensions(&out), (10, 20));
}

#[test]
fn png_source_re_encodes_as_png() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.png");
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        8,
        8,
        image::Rgb([10, 20, 30]),
    ));
    img.save(&path).expect("write fixture");

    let out = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(&out[..4], b"\x89PNG");
}

#[test]
fn webp_source_re_encodes_as_webp() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(8, 8, 1)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::with_mime(&path, "image/webp"))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(&out[..4], b"RIFF");
    assert_eq!(&out[8..12], b"WEBP");
}

#[test]
fn unknown_mime_falls_back_to_jpeg() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(8, 8, 1)).expect("write fixture");

    let out = prepare_picked(&FileImageSource::with_mime(&path, "image/gif"))
        .expect("prepare")
        .expect("image bytes");
    assert_eq!(&out[..2], [0xFF, 0xD8]);
}

#[test]
fn corrupt_input_fails_at_decode() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, b"definitely not an image").expect("write fixture");

    let result = prepare_picked(&FileImageSource::new(&path));
    assert!(result.is_err());

    // Graceful degradation is the caller's one-liner.
    assert_eq!(result.ok().flatten(), None);
}

#[tokio::test]
async fn async_dispatch_matches_the_blocking_path() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("picked.jpg");
    std::fs::write(&path, jpeg_with_orientation(10, 20, 6)).expect("write fixture");

    let blocking = prepare_picked(&FileImageSource::new(&path))
        .expect("prepare")
        .expect("image bytes");
    let dispatched = prepare_picked_async(FileImageSource::new(&path))
        .await
        .expect("prepare async")
        .expect("image bytes");
    assert_eq!(blocking, dispatched);
}
