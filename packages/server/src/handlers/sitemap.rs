use std::fmt::Write as _;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use common::PaintingRecord;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Site pages listed ahead of the paintings, relative to the public URL.
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("", "weekly", "1.0"),
    ("/gallery", "daily", "0.9"),
    ("/artist", "monthly", "0.8"),
];

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the sitemap for `base_url` and the given published paintings.
pub fn render_sitemap(base_url: &str, paintings: &[PaintingRecord]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (path, changefreq, priority) in STATIC_PAGES {
        let _ = writeln!(
            xml,
            "  <url><loc>{}</loc><changefreq>{changefreq}</changefreq><priority>{priority}</priority></url>",
            escape_xml(&format!("{base}{path}")),
        );
    }

    for painting in paintings {
        let loc = format!("{base}/gallery?highlight={}", urlencoding::encode(&painting.id));
        let _ = writeln!(
            xml,
            "  <url><loc>{}</loc><lastmod>{}</lastmod><changefreq>monthly</changefreq><priority>0.7</priority></url>",
            escape_xml(&loc),
            painting.updated_at.format("%Y-%m-%d"),
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let paintings = state.paintings.list(Some(true)).await?;
    let body = render_sitemap(&state.config.server.public_url, &paintings);
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body))
}
