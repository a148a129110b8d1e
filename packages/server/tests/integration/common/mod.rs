use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use ::common::config::{GalleryConfig, StorageBackend, StorageConfig, UploadConfig};
use ::common::storage::memory::MemoryObjectStore;
use ::common::{PaintingRecord, PaintingStatus};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use reqwest::Client;
use serde_json::Value;

use server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::state::AppState;
use server::store::PaintingStore;
use server::store::memory::{MemoryPaintingStore, MemorySiteStore};
use server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const MEDIA_BASE: &str = "http://media.test";
pub const ORIGINALS: &str = "paintings";
pub const THUMBNAILS: &str = "paintings-thumbnails";

pub mod routes {
    pub const GALLERY: &str = "/api/v1/gallery";
    pub const GALLERY_YEARS: &str = "/api/v1/gallery/years";
    pub const GALLERY_FEATURED: &str = "/api/v1/gallery/featured";
    pub const SITE: &str = "/api/v1/site";
    pub const SITEMAP: &str = "/sitemap.xml";
    pub const PAINTINGS: &str = "/api/v1/admin/paintings";
    pub const UPLOADS: &str = "/api/v1/admin/uploads";
    pub const FEATURED: &str = "/api/v1/admin/featured";
    pub const HOME_SETTINGS: &str = "/api/v1/admin/settings/home";
    pub const SITE_SETTINGS: &str = "/api/v1/admin/settings/site";
    pub const ARTIST: &str = "/api/v1/admin/artist";

    pub fn gallery_painting(id: &str) -> String {
        format!("/api/v1/gallery/{id}")
    }

    pub fn painting(id: &str) -> String {
        format!("/api/v1/admin/paintings/{id}")
    }

    pub fn painting_published(id: &str) -> String {
        format!("/api/v1/admin/paintings/{id}/published")
    }
}

/// A running test server backed by in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub paintings: Arc<MemoryPaintingStore>,
    pub objects: Arc<MemoryObjectStore>,
    /// Token carrying the admin role.
    pub token: String,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
            public_url: "https://gallery.test".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            public_base_url: MEDIA_BASE.to_string(),
            ..Default::default()
        },
        upload: UploadConfig::default(),
        gallery: GalleryConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Vec::new()).await
    }

    /// Spawn with `records` already in the painting store.
    pub async fn spawn_with(records: Vec<PaintingRecord>) -> Self {
        let paintings = Arc::new(MemoryPaintingStore::with_records(records));
        let objects = Arc::new(MemoryObjectStore::new(MEDIA_BASE));

        let state = AppState::new(
            test_config(),
            paintings.clone(),
            Arc::new(MemorySiteStore::new()),
            objects.clone(),
        );
        let (listener, addr) = bind().await;
        serve(listener, state);

        Self {
            addr,
            client: Client::new(),
            paintings,
            objects,
            token: token_with_role("admin"),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Send a multipart upload. Transport errors are returned rather than
    /// panicking because the server may stop reading an oversized body early.
    pub async fn try_upload(
        &self,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
        year: Option<&str>,
    ) -> Result<TestResponse, reqwest::Error> {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let mut form = reqwest::multipart::Form::new();
        if let Some(year) = year {
            form = form.text("year", year.to_string());
        }
        form = form.part("file", part);

        let res = self
            .client
            .post(self.url(routes::UPLOADS))
            .header("Authorization", format!("Bearer {}", self.token))
            .multipart(form)
            .send()
            .await?;

        Ok(TestResponse::from_response(res).await)
    }

    pub async fn upload(
        &self,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
        year: Option<&str>,
    ) -> TestResponse {
        self.try_upload(file_name, mime, file_bytes, year)
            .await
            .expect("Failed to send multipart upload request")
    }

    /// Create a painting through the API, returning its JSON.
    pub async fn create_painting(&self, title: &str, year: i32, published: bool) -> Value {
        let res = self
            .post_with_token(
                routes::PAINTINGS,
                &serde_json::json!({
                    "title": title,
                    "year": year,
                    "imageUrl": format!("{MEDIA_BASE}/{ORIGINALS}/{year}/{title}.jpg"),
                    "thumbnailUrl": format!("{MEDIA_BASE}/{THUMBNAILS}/{year}/{title}_thumb.jpg"),
                    "published": published,
                }),
                &self.token,
            )
            .await;
        assert_eq!(res.status, 201, "Create failed: {}", res.text);
        res.body
    }

    pub async fn stored(&self, id: &str) -> Option<PaintingRecord> {
        self.paintings.get(id).await.unwrap()
    }
}

/// Bind a listener on a random local port.
pub async fn bind() -> (tokio::net::TcpListener, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Serve the router for `state` in the background.
pub fn serve(listener: tokio::net::TcpListener, state: AppState) {
    let app = server::build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

pub fn token_with_role(role: &str) -> String {
    jwt::sign(JWT_SECRET, "tester", role, 1).expect("Failed to sign token")
}

/// A published record for seeding stores directly.
pub fn record(id: &str, year: i32, status: PaintingStatus, title: &str, order: i32) -> PaintingRecord {
    let now = Utc::now();
    PaintingRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        year,
        dimensions: None,
        status,
        artist: None,
        image_url: format!("{MEDIA_BASE}/{ORIGINALS}/{year}/{id}.jpg"),
        thumbnail_url: format!("{MEDIA_BASE}/{THUMBNAILS}/{year}/{id}_thumb.jpg"),
        published: true,
        order,
        created_at: now,
        updated_at: now,
    }
}

/// Encode a noisy `width` x `height` JPEG. Noise keeps the file large.
pub fn noisy_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut seed: u32 = 0x2545_f491;
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let n = seed.to_le_bytes();
        Rgb([
            n[0] / 2 + (x % 128) as u8,
            n[1] / 2 + (y % 128) as u8,
            n[2],
        ])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
        .expect("Failed to encode test JPEG");
    out.into_inner()
}

/// Extract `(bucket, path)` from a URL produced by the memory object store.
pub fn object_key(url: &str) -> (String, String) {
    let rest = url
        .strip_prefix(MEDIA_BASE)
        .and_then(|r| r.strip_prefix('/'))
        .expect("URL not under the media base");
    let (bucket, path) = rest.split_once('/').expect("URL has no bucket");
    (bucket.to_string(), path.to_string())
}
