//! End-to-end checks of the HTTP surface, driving the router in-process.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use gallery_share::config::SiteConfig;
use gallery_share::server::{AppState, router};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn write_files(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
}

/// Content root with one image folder per collection, a front end, and a
/// file outside the image root.
fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_files(&root.join("images/daily/promo"), &["01.jpg", "02.png", "readme.txt"]);
    write_files(&root.join("images/history/summer"), &["photo.jpg"]);
    write_files(&root.join("public"), &["index.html"]);
    write_files(root, &["secret.txt"]);
    tmp
}

fn app(tmp: &TempDir) -> Router {
    app_with(tmp, SiteConfig::default())
}

fn app_with(tmp: &TempDir, config: SiteConfig) -> Router {
    let state = AppState::new(tmp.path(), &config).unwrap();
    router(Arc::new(state))
}

async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut request = Request::builder().uri(uri).header(header::HOST, "gallery.test");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn header_value<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// =========================================================================
// /api/images
// =========================================================================

#[tokio::test]
async fn index_lists_both_collections() {
    let tmp = site();
    let response = get(app(&tmp), "/api/images", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let mut daily: Vec<&str> = json["daily"]["promo"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    daily.sort();
    assert_eq!(daily, ["01.jpg", "02.png"]);
    assert_eq!(json["history"], serde_json::json!({ "summer": ["photo.jpg"] }));
}

#[tokio::test]
async fn index_with_missing_image_root_is_empty() {
    let tmp = TempDir::new().unwrap();
    let response = get(app(&tmp), "/api/images", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"daily":{},"history":{}}"#);
}

// =========================================================================
// /image-page/*
// =========================================================================

#[tokio::test]
async fn plain_path_renders_share_page() {
    let tmp = site();
    let response = get(app(&tmp), "/image-page/images/daily/promo/02.png", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CACHE_CONTROL),
        "no-store, no-cache, must-revalidate, private"
    );
    assert_eq!(header_value(&response, header::PRAGMA), "no-cache");
    assert_eq!(header_value(&response, header::EXPIRES), "0");
    assert!(header_value(&response, header::CONTENT_TYPE).starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains(
        r#"<meta property="og:image" content="http://gallery.test/images/daily/promo/02.png">"#
    ));
    assert!(html.contains(
        r#"<meta property="og:url" content="http://gallery.test/image-page/images%2Fdaily%2Fpromo%2F02.png">"#
    ));
    assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
    assert!(html.contains("/images/daily/promo/01.jpg"));
}

#[tokio::test]
async fn encoded_slash_redirects_to_query_form() {
    let tmp = site();
    let response = get(app(&tmp), "/image-page/images%2Fdaily%2Fpromo%2F01.jpg", &[]).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        header_value(&response, header::LOCATION),
        "/image?img=images%2Fdaily%2Fpromo%2F01.jpg"
    );
}

#[tokio::test]
async fn traversal_is_not_found() {
    let tmp = site();
    for uri in [
        "/image-page/images/../secret.txt",
        "/image-page/..%2Fsecret.txt",
        "/image-page/images%2F..%2F..%2Fetc%2Fpasswd",
        "/image-page/%2Fetc%2Fpasswd",
    ] {
        let response = get(app(&tmp), uri, &[]).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_text(response).await, "Image not found", "{uri}");
    }
}

#[tokio::test]
async fn directory_and_missing_file_are_not_found() {
    let tmp = site();
    for uri in [
        "/image-page/images/daily/promo",
        "/image-page/images/daily/promo/nope.jpg",
        "/image-page/",
    ] {
        let response = get(app(&tmp), uri, &[]).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn forwarded_proto_builds_https_links() {
    let tmp = site();
    let response = get(
        app(&tmp),
        "/image-page/images/history/summer/photo.jpg",
        &[("x-forwarded-proto", "https,http")],
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains(r#"content="https://gallery.test/images/history/summer/photo.jpg""#));
}

#[tokio::test]
async fn forwarded_proto_ignored_when_proxy_untrusted() {
    let tmp = site();
    let mut config = SiteConfig::default();
    config.server.trust_proxy = false;

    let response = get(
        app_with(&tmp, config),
        "/image-page/images/history/summer/photo.jpg",
        &[("x-forwarded-proto", "https")],
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains(r#"content="http://gallery.test/images/history/summer/photo.jpg""#));
    assert!(!html.contains("https://"));
}

// =========================================================================
// /image?img=
// =========================================================================

#[tokio::test]
async fn fallback_page_renders_without_redirect() {
    let tmp = site();
    let response = get(app(&tmp), "/image?img=images%2Fdaily%2Fpromo%2F01.jpg", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::PRAGMA), "no-cache");

    let html = body_text(response).await;
    assert!(html.contains(
        r#"<meta property="og:url" content="http://gallery.test/image?img=images%2Fdaily%2Fpromo%2F01.jpg">"#
    ));
    assert!(html.contains(r#"content="http://gallery.test/images/daily/promo/01.jpg""#));
}

#[tokio::test]
async fn redirect_target_resolves_for_escaped_file_name() {
    let tmp = site();
    write_files(&tmp.path().join("images/daily/promo"), &["sale%41.jpg"]);

    let response = get(
        app(&tmp),
        "/image-page/images%2Fdaily%2Fpromo%2Fsale%2541.jpg",
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = header_value(&response, header::LOCATION).to_string();
    assert_eq!(location, "/image?img=images%2Fdaily%2Fpromo%2Fsale%2541.jpg");

    let response = get(app(&tmp), &location, &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"content="http://gallery.test/images/daily/promo/sale%2541.jpg""#));
}

#[tokio::test]
async fn fallback_rejects_traversal_and_missing_param() {
    let tmp = site();
    for uri in ["/image?img=..%2Fsecret.txt", "/image"] {
        let response = get(app(&tmp), uri, &[]).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

// =========================================================================
// Static files
// =========================================================================

#[tokio::test]
async fn images_are_served_with_revalidation() {
    let tmp = site();
    let response = get(app(&tmp), "/images/daily/promo/01.jpg", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CACHE_CONTROL),
        "public, max-age=0, must-revalidate"
    );
    assert_eq!(body_text(response).await, "01.jpg");
}

#[tokio::test]
async fn front_end_is_served_from_public() {
    let tmp = site();
    let response = get(app(&tmp), "/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "index.html");

    let response = get(app(&tmp), "/secret.txt", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
