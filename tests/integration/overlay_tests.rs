//! Overlay integration tests.
//!
//! Tests verify that the watermark is stamped through the full HTTP path and
//! that a missing or late asset never fails a request.

use axum::http::StatusCode;
use image::Rgba;
use tempfile::TempDir;

use pumpify::transform::decode_rgba;
use pumpify::{ImageTransformer, RouterConfig};

use super::test_utils::{
    body_bytes, create_test_png, image_upload, multipart_content_type, post_process, router_with,
    write_overlay,
};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Resampling may shift a channel by a unit or two.
fn is_red(pixel: &Rgba<u8>) -> bool {
    pixel[0] >= 250 && pixel[1] <= 5 && pixel[2] <= 5 && pixel[3] >= 250
}

async fn process(transformer: ImageTransformer, png: &[u8]) -> image::RgbaImage {
    let router = router_with(transformer, RouterConfig::new());
    let response = post_process(
        router,
        Some(&multipart_content_type()),
        image_upload(png, "image/png"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    decode_rgba(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_overlay_stamped_bottom_right() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pill.png");
    write_overlay(&path, RED);

    let png = create_test_png(200, 200, Rgba([200, 200, 200, 255]));
    let img = process(ImageTransformer::new(&path), &png).await;

    // 50x50 overlay at (130, 130)
    assert_eq!(img.dimensions(), (200, 200));
    assert!(is_red(img.get_pixel(155, 155)));
    assert_eq!(*img.get_pixel(10, 10), Rgba([190, 200, 190, 255]));
    assert_eq!(*img.get_pixel(125, 155), Rgba([190, 200, 190, 255]));
    assert_eq!(*img.get_pixel(190, 190), Rgba([190, 200, 190, 255]));
}

#[tokio::test]
async fn test_missing_overlay_serves_plain_recolor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.png");

    let png = create_test_png(64, 48, Rgba([50, 50, 50, 255]));
    let img = process(ImageTransformer::new(&path), &png).await;

    assert_eq!(img.dimensions(), (64, 48));
    assert!(img.pixels().all(|p| *p == Rgba([25, 125, 25, 255])));
}

#[tokio::test]
async fn test_overlay_picked_up_once_it_appears() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pill.png");
    let router = router_with(ImageTransformer::new(&path), RouterConfig::new());
    let png = create_test_png(200, 200, Rgba([200, 200, 200, 255]));

    let before = post_process(
        router.clone(),
        Some(&multipart_content_type()),
        image_upload(&png, "image/png"),
    )
    .await;
    assert_eq!(before.status(), StatusCode::OK);
    let before = decode_rgba(&body_bytes(before).await).unwrap();
    assert_eq!(*before.get_pixel(155, 155), Rgba([190, 200, 190, 255]));

    write_overlay(&path, RED);

    let after = post_process(
        router,
        Some(&multipart_content_type()),
        image_upload(&png, "image/png"),
    )
    .await;
    assert_eq!(after.status(), StatusCode::OK);
    let after = decode_rgba(&body_bytes(after).await).unwrap();
    assert!(is_red(after.get_pixel(155, 155)));
}

#[tokio::test]
async fn test_tiny_image_skips_overlay() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pill.png");
    write_overlay(&path, RED);

    // Side rounds down to 0, nothing to stamp
    let png = create_test_png(3, 3, Rgba([200, 200, 200, 255]));
    let img = process(ImageTransformer::new(&path), &png).await;

    assert_eq!(img.dimensions(), (3, 3));
    assert!(img.pixels().all(|p| *p == Rgba([190, 200, 190, 255])));
}

#[tokio::test]
async fn test_overlay_on_transparent_upload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pill.png");
    write_overlay(&path, Rgba([255, 0, 0, 128]));

    let png = create_test_png(200, 200, Rgba([0, 0, 0, 0]));
    let img = process(ImageTransformer::new(&path), &png).await;

    // Recolored background keeps its zero alpha
    assert_eq!(*img.get_pixel(10, 10), Rgba([0, 80, 0, 0]));

    // Half-alpha stamp: every channel, alpha included, lands halfway
    let inside = img.get_pixel(155, 155);
    assert!((120..=136).contains(&inside[0]), "got {:?}", inside);
    assert!((32..=48).contains(&inside[1]), "got {:?}", inside);
    assert!((56..=72).contains(&inside[3]), "got {:?}", inside);
}
