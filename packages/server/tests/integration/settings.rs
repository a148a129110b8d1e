use ::common::PaintingStatus;
use serde_json::json;

use crate::common::{TestApp, record, routes};

async fn app_with_paintings(n: usize) -> TestApp {
    let records = (0..n)
        .map(|i| {
            let mut r = record(&format!("p{i}"), 2020, PaintingStatus::ForSale, "画", i as i32);
            r.published = i != 1;
            r
        })
        .collect();
    TestApp::spawn_with(records).await
}

mod featured {
    use super::*;

    #[tokio::test]
    async fn featured_selection_round_trips_in_order() {
        let app = app_with_paintings(5).await;

        let res = app
            .put_with_token(routes::FEATURED, &json!({"ids": ["p3", "p0", "p1", "p2"]}), &app.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::FEATURED, &app.token).await;
        assert_eq!(res.body["ids"], json!(["p3", "p0", "p1", "p2"]));

        // p1 is unpublished, so the public view skips it.
        let res = app.get(routes::GALLERY_FEATURED).await;
        let ids: Vec<&str> = res.body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["p3", "p0", "p2"]);
    }

    #[tokio::test]
    async fn featured_size_and_existence_are_enforced() {
        let app = app_with_paintings(8).await;

        for ids in [
            json!(["p0", "p2"]),
            json!(["p0", "p2", "p3", "p4", "p5", "p6", "p7"]),
            json!(["p0", "p0", "p2"]),
            json!(["p0", "p2", "missing"]),
        ] {
            let res = app
                .put_with_token(routes::FEATURED, &json!({ "ids": ids }), &app.token)
                .await;
            assert_eq!(res.status, 400, "{ids}: {}", res.text);
        }
    }

    #[tokio::test]
    async fn deleting_a_painting_drops_it_from_featured() {
        let app = app_with_paintings(4).await;
        app.put_with_token(routes::FEATURED, &json!({"ids": ["p0", "p2", "p3"]}), &app.token)
            .await;

        let res = app.delete_with_token(&routes::painting("p2"), &app.token).await;
        assert_eq!(res.status, 204);

        // Below the minimum of three is tolerated after a delete.
        let res = app.get_with_token(routes::FEATURED, &app.token).await;
        assert_eq!(res.body["ids"], json!(["p0", "p3"]));

        let res = app.get(routes::GALLERY_FEATURED).await;
        assert_eq!(res.body["items"].as_array().unwrap().len(), 2);
    }
}

mod documents {
    use super::*;

    #[tokio::test]
    async fn home_settings_merge() {
        let app = TestApp::spawn().await;
        let res = app
            .put_with_token(
                routes::HOME_SETTINGS,
                &json!({"hero": {"subtitle": "水墨丹青"}, "artistStatement": "以笔墨写心"}),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["hero"]["subtitle"], "水墨丹青");
        assert_eq!(res.body["hero"]["title"], "贝军国画");

        let res = app.get(routes::SITE).await;
        assert_eq!(res.body["home"]["artistStatement"], "以笔墨写心");
    }

    #[tokio::test]
    async fn home_settings_reject_long_title() {
        let app = TestApp::spawn().await;
        let res = app
            .put_with_token(
                routes::HOME_SETTINGS,
                &json!({"hero": {"title": "长".repeat(51)}}),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn site_settings_update() {
        let app = TestApp::spawn().await;
        let res = app
            .put_with_token(
                routes::SITE_SETTINGS,
                &json!({"wechatId": "beijun_art", "icp": "京ICP备00000000号"}),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["wechatId"], "beijun_art");
        assert_eq!(res.body["siteName"], "贝军国画");
    }

    #[tokio::test]
    async fn artist_profile_update() {
        let app = TestApp::spawn().await;
        let res = app
            .put_with_token(
                routes::ARTIST,
                &json!({
                    "bio": "自幼习画",
                    "timeline": [{"year": 1998, "title": "首次个展"}],
                }),
                &app.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::ARTIST, &app.token).await;
        assert_eq!(res.body["bio"], "自幼习画");
        assert_eq!(res.body["timeline"][0]["year"], 1998);
        assert_eq!(res.body["name"], "贝军");

        let res = app
            .put_with_token(routes::ARTIST, &json!({"name": ""}), &app.token)
            .await;
        assert_eq!(res.status, 400);
    }
}
