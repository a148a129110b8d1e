use crate::common::{ORIGINALS, THUMBNAILS, TestApp, noisy_jpeg, object_key};

fn decoded_width(bytes: &[u8]) -> u32 {
    image::load_from_memory(bytes)
        .expect("stored object is not an image")
        .width()
}

#[tokio::test]
async fn large_jpeg_yields_original_and_thumbnail_under_year() {
    let app = TestApp::spawn().await;
    let jpeg = noisy_jpeg(2000, 1200, 90);
    assert!(jpeg.len() > 512 * 1024, "fixture should be large");
    assert!(jpeg.len() < 10 * 1024 * 1024, "fixture must fit the limit");

    let res = app.upload("春山.jpg", "image/jpeg", jpeg, Some("2024")).await;
    assert_eq!(res.status, 201, "{}", res.text);

    let image_url = res.body["imageUrl"].as_str().unwrap();
    let thumbnail_url = res.body["thumbnailUrl"].as_str().unwrap();
    assert_ne!(image_url, thumbnail_url);
    assert!(image_url.contains("2024/"));
    assert!(thumbnail_url.contains("2024/"));
    assert!(!image_url.contains("春山"), "user filename must not leak into keys");
    assert_eq!(res.body["width"], 2000);
    assert_eq!(res.body["height"], 1200);

    let (bucket, path) = object_key(thumbnail_url);
    assert_eq!(bucket, THUMBNAILS);
    let thumb = app.objects.object(&bucket, &path).await.expect("thumbnail stored");
    assert_eq!(thumb.content_type, "image/jpeg");
    assert_eq!(decoded_width(&thumb.data), 400);

    let (bucket, path) = object_key(image_url);
    assert_eq!(bucket, ORIGINALS);
    let original = app.objects.object(&bucket, &path).await.expect("original stored");
    assert_eq!(res.body["size"], original.data.len() as u64);
}

#[tokio::test]
async fn small_image_is_not_upscaled() {
    let app = TestApp::spawn().await;
    let res = app
        .upload("small.jpg", "image/jpeg", noisy_jpeg(200, 150, 85), Some("2023"))
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let (bucket, path) = object_key(res.body["thumbnailUrl"].as_str().unwrap());
    let thumb = app.objects.object(&bucket, &path).await.unwrap();
    assert_eq!(decoded_width(&thumb.data), 200);
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_any_write() {
    let app = TestApp::spawn().await;
    let mut bytes = noisy_jpeg(64, 64, 80);
    bytes.resize(12 * 1024 * 1024, 0);

    // The server may close the connection before the client finishes sending.
    if let Ok(res) = app.try_upload("huge.jpg", "image/jpeg", bytes, Some("2024")).await {
        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
    }
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app
        .upload("notes.gif", "image/gif", b"GIF89a....".to_vec(), Some("2024"))
        .await;
    assert_eq!(res.status, 415, "{}", res.text);
    assert_eq!(res.body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn declared_type_must_match_content() {
    let app = TestApp::spawn().await;
    let res = app
        .upload("fake.png", "image/png", noisy_jpeg(32, 32, 80), None)
        .await;
    assert_eq!(res.status, 415, "{}", res.text);
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn thumbnail_write_failure_falls_back_to_original() {
    let app = TestApp::spawn().await;
    app.objects.fail_writes_to(THUMBNAILS).await;

    let res = app
        .upload("a.jpg", "image/jpeg", noisy_jpeg(800, 600, 85), Some("2022"))
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["imageUrl"], res.body["thumbnailUrl"]);
    assert_eq!(app.objects.len().await, 1);
}

#[tokio::test]
async fn original_write_failure_fails_upload() {
    let app = TestApp::spawn().await;
    app.objects.fail_writes_to(ORIGINALS).await;

    let res = app
        .upload("a.jpg", "image/jpeg", noisy_jpeg(800, 600, 85), Some("2022"))
        .await;
    assert_eq!(res.status, 500, "{}", res.text);
    assert_eq!(res.body["code"], "INTERNAL_ERROR");
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn year_handling() {
    use chrono::Datelike;

    let app = TestApp::spawn().await;
    let current = chrono::Utc::now().year();

    let res = app
        .upload("a.jpg", "image/jpeg", noisy_jpeg(64, 64, 80), Some("soon"))
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let url = res.body["imageUrl"].as_str().unwrap();
    assert!(url.contains(&format!("/{current}/")), "{url}");

    let res = app
        .upload("a.jpg", "image/jpeg", noisy_jpeg(64, 64, 80), Some("1700"))
        .await;
    assert_eq!(res.status, 400, "{}", res.text);
}

#[tokio::test]
async fn upload_requires_admin() {
    let app = TestApp::spawn().await;
    let part = reqwest::multipart::Part::bytes(noisy_jpeg(16, 16, 80))
        .file_name("a.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let res = app
        .client
        .post(app.url(crate::common::routes::UPLOADS))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
    assert!(app.objects.is_empty().await);
}
