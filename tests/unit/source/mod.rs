use super::*;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn missing_or_empty_upload_asks_for_a_file() {
    for input in [None, Some(Vec::new())] {
        let err = resolve_upload(input).unwrap_err();
        assert_eq!(err.user_message(), "Please select an image file.");
    }
}

#[test]
fn upload_becomes_a_base64_data_url_with_sniffed_mime() {
    let ImageSource::DataUrl(url) = resolve_upload(Some(png_bytes())).unwrap() else {
        panic!("expected data url");
    };
    assert!(url.starts_with("data:image/png;base64,"));

    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#.to_vec();
    assert!(data_url_from_bytes(&svg).starts_with("data:image/svg+xml;base64,"));

    assert!(data_url_from_bytes(b"not an image").starts_with("data:application/octet-stream;base64,"));
}

#[test]
fn video_url_resolves_to_max_resolution_thumbnail() {
    let source = resolve_video_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
    assert_eq!(
        source,
        ImageSource::Remote(
            Url::parse("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg").unwrap()
        )
    );
    assert_eq!(source.kind(), "remote");
}

#[test]
fn unrecognized_video_url_is_a_validation_error() {
    let err = resolve_video_url("https://example.com/video").unwrap_err();
    assert!(matches!(err, ThumbkitError::Validation(_)));
    assert_eq!(err.user_message(), "Enter a valid YouTube URL.");
}
