use ::common::PaintingStatus;

use crate::common::{TestApp, record, routes};

fn ids(body: &serde_json::Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

async fn seeded_app() -> TestApp {
    let mut hidden = record("hidden", 2023, PaintingStatus::ForSale, "未发布山水", 0);
    hidden.published = false;
    TestApp::spawn_with(vec![
        record("shanshui", 2023, PaintingStatus::ForSale, "山水", 2),
        record("renwu", 2022, PaintingStatus::Sold, "人物", 1),
        record("huaniao", 2023, PaintingStatus::Customizable, "花鸟", 3),
        hidden,
    ])
    .await
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_only_published_in_curated_order() {
        let app = seeded_app().await;

        let res = app.get(routes::GALLERY).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res.body), vec!["renwu", "shanshui", "huaniao"]);
        assert_eq!(res.body["pagination"]["totalItems"], 3);
        assert_eq!(res.body["years"], serde_json::json!([2023, 2022]));
    }

    #[tokio::test]
    async fn filters_by_year_status_and_search() {
        let app = seeded_app().await;

        let res = app.get(&format!("{}?year=2023", routes::GALLERY)).await;
        assert_eq!(ids(&res.body), vec!["shanshui", "huaniao"]);

        let res = app
            .get(&format!("{}?year=2023&status=CUSTOMIZABLE", routes::GALLERY))
            .await;
        assert_eq!(ids(&res.body), vec!["huaniao"]);

        let res = app.get(&format!("{}?q=%E4%BA%BA%E7%89%A9", routes::GALLERY)).await;
        assert_eq!(ids(&res.body), vec!["renwu"]);

        // The unpublished painting matches the text but stays hidden.
        let res = app.get(&format!("{}?search=%E5%B1%B1%E6%B0%B4", routes::GALLERY)).await;
        assert_eq!(ids(&res.body), vec!["shanshui"]);
    }

    #[tokio::test]
    async fn malformed_params_are_ignored() {
        let app = seeded_app().await;

        let res = app
            .get(&format!(
                "{}?year=abc&status=UNKNOWN&page=zero&per_page=-1",
                routes::GALLERY
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res.body).len(), 3);
        assert_eq!(res.body["pagination"]["currentPage"], 1);
    }

    #[tokio::test]
    async fn pages_are_clamped_and_windowed() {
        let records = (0..60)
            .map(|i| record(&format!("p{i:02}"), 2020, PaintingStatus::ForSale, "画", i))
            .collect();
        let app = TestApp::spawn_with(records).await;

        let res = app
            .get(&format!("{}?page=9999&per_page=5", routes::GALLERY))
            .await;
        assert_eq!(res.body["pagination"]["currentPage"], 12);
        assert_eq!(res.body["pagination"]["totalPages"], 12);
        assert_eq!(res.body["pagination"]["hasNextPage"], false);
        assert_eq!(ids(&res.body), vec!["p55", "p56", "p57", "p58", "p59"]);

        let res = app
            .get(&format!("{}?page=-5&per_page=5", routes::GALLERY))
            .await;
        assert_eq!(res.body["pagination"]["currentPage"], 1);
        let window = res.body["pageWindow"].as_array().unwrap();
        assert_eq!(window.first().unwrap()["number"], 1);
        assert_eq!(window.last().unwrap()["number"], 12);
        assert!(window.iter().any(|l| l["kind"] == "ellipsis"));
    }
}

mod single {
    use super::*;

    #[tokio::test]
    async fn published_painting_is_returned() {
        let app = seeded_app().await;
        let res = app.get(&routes::gallery_painting("shanshui")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "山水");
        assert_eq!(res.body["status"], "FOR_SALE");
    }

    #[tokio::test]
    async fn unpublished_or_missing_is_not_found() {
        let app = seeded_app().await;
        let res = app.get(&routes::gallery_painting("hidden")).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get(&routes::gallery_painting("nope")).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn years_endpoint_is_descending() {
        let app = seeded_app().await;
        let res = app.get(routes::GALLERY_YEARS).await;
        assert_eq!(res.body["years"], serde_json::json!([2023, 2022]));
    }
}

mod site {
    use super::*;

    #[tokio::test]
    async fn site_document_has_defaults() {
        let app = TestApp::spawn().await;
        let res = app.get(routes::SITE).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["site"]["siteName"], "贝军国画");
        assert_eq!(res.body["artist"]["name"], "贝军");
        assert_eq!(res.body["featuredIds"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn sitemap_lists_published_paintings() {
        let app = seeded_app().await;
        let res = app.get(routes::SITEMAP).await;
        assert_eq!(res.status, 200);
        assert!(res.text.contains("<loc>https://gallery.test/gallery</loc>"));
        assert!(res.text.contains("gallery?highlight=shanshui"));
        assert!(!res.text.contains("highlight=hidden"));
    }
}
