use ::common::PaintingStatus;
use ::common::storage::ObjectStore;
use serde_json::json;

use crate::common::{ORIGINALS, TestApp, noisy_jpeg, record, routes, token_with_role};

mod auth {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.get(routes::PAINTINGS).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.get_with_token(routes::PAINTINGS, "not-a-jwt").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn non_admin_role_is_forbidden() {
        let app = TestApp::spawn().await;
        let res = app
            .get_with_token(routes::PAINTINGS, &token_with_role("viewer"))
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn create_starts_unpublished_and_appends_order() {
        let app = TestApp::spawn().await;

        let first = app.create_painting("first", 2023, false).await;
        let second = app.create_painting("second", 2024, false).await;

        assert_eq!(first["published"], false);
        assert_eq!(first["status"], "FOR_SALE");
        assert_eq!(first["order"], 0);
        assert_eq!(second["order"], 1);
        assert_ne!(first["id"], second["id"]);

        // Hidden from the public until published.
        let res = app.get(routes::GALLERY).await;
        assert_eq!(res.body["pagination"]["totalItems"], 0);
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::PAINTINGS,
                &json!({
                    "title": "   ",
                    "year": 2024,
                    "imageUrl": "https://cdn.example.com/a.jpg",
                    "thumbnailUrl": "https://cdn.example.com/a_thumb.jpg",
                }),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_with_token(
                routes::PAINTINGS,
                &json!({
                    "title": "远山",
                    "year": 1850,
                    "imageUrl": "https://cdn.example.com/a.jpg",
                    "thumbnailUrl": "https://cdn.example.com/a_thumb.jpg",
                }),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert!(res.body["message"].as_str().unwrap().contains("1850"));

        let res = app
            .post_with_token(routes::PAINTINGS, &json!({"title": 5}), &app.token)
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn publish_makes_painting_public() {
        let app = TestApp::spawn().await;
        let created = app.create_painting("publish-me", 2024, false).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .put_with_token(
                &routes::painting_published(id),
                &json!({"published": true}),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["published"], true);

        let res = app.get(&routes::gallery_painting(id)).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let app = TestApp::spawn().await;
        let created = app.create_painting("patch-me", 2024, true).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(
                &routes::painting(id),
                &json!({"status": "SOLD", "dimensions": "68x136 cm"}),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "SOLD");
        assert_eq!(res.body["dimensions"], "68x136 cm");
        assert_eq!(res.body["title"], "patch-me");

        let stored = app.stored(id).await.unwrap();
        assert!(stored.updated_at > stored.created_at);

        let res = app
            .patch_with_token(&routes::painting(id), &json!({"dimensions": null}), &app.token)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body.get("dimensions").is_none() || res.body["dimensions"].is_null());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let app = TestApp::spawn().await;
        let created = app.create_painting("delete-me", 2024, true).await;
        let id = created["id"].as_str().unwrap();

        let res = app.delete_with_token(&routes::painting(id), &app.token).await;
        assert_eq!(res.status, 204);
        assert!(app.stored(id).await.is_none());

        let res = app.delete_with_token(&routes::painting(id), &app.token).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::painting(id), &app.token).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_removes_uploaded_assets() {
        let app = TestApp::spawn().await;
        app.objects
            .put(ORIGINALS, "2019/unrelated.jpg", b"keep", "image/jpeg")
            .await
            .unwrap();

        let upload = app.upload("秋山.jpg", "image/jpeg", noisy_jpeg(800, 600, 80), Some("2024")).await;
        assert_eq!(upload.status, 201, "{}", upload.text);
        assert_eq!(app.objects.len().await, 3);

        let res = app
            .post_with_token(
                routes::PAINTINGS,
                &json!({
                    "title": "秋山",
                    "year": 2024,
                    "imageUrl": upload.body["imageUrl"],
                    "thumbnailUrl": upload.body["thumbnailUrl"],
                }),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.body["id"].as_str().unwrap();

        let res = app.delete_with_token(&routes::painting(id), &app.token).await;
        assert_eq!(res.status, 204);
        assert_eq!(
            app.objects.keys().await,
            vec![(ORIGINALS.to_string(), "2019/unrelated.jpg".to_string())]
        );
    }

    #[tokio::test]
    async fn delete_leaves_foreign_asset_urls_alone() {
        let mut legacy = record("legacy", 2015, PaintingStatus::Sold, "旧作", 0);
        legacy.image_url = "/images/paintings/2015/legacy.jpg".into();
        legacy.thumbnail_url = "https://elsewhere.example.com/legacy_thumb.jpg".into();
        let app = TestApp::spawn_with(vec![legacy]).await;
        app.objects
            .put(ORIGINALS, "2015/legacy.jpg", b"keep", "image/jpeg")
            .await
            .unwrap();

        let res = app.delete_with_token(&routes::painting("legacy"), &app.token).await;
        assert_eq!(res.status, 204);
        assert!(app.stored("legacy").await.is_none());
        assert_eq!(app.objects.len().await, 1);
    }

    #[tokio::test]
    async fn admin_list_filters_by_published() {
        let app = TestApp::spawn().await;
        app.create_painting("draft", 2024, false).await;
        app.create_painting("live", 2024, true).await;

        let res = app.get_with_token(routes::PAINTINGS, &app.token).await;
        assert_eq!(res.body["pagination"]["totalItems"], 2);

        let res = app
            .get_with_token(&format!("{}?published=false", routes::PAINTINGS), &app.token)
            .await;
        assert_eq!(res.body["pagination"]["totalItems"], 1);
        assert_eq!(res.body["items"][0]["title"], "draft");
    }
}
