use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;

use super::{AppState, HttpError, SHARE_PREFIX};
use crate::index::{GalleryIndex, build_index};
use crate::render::{render_fallback_page, render_share_page};
use crate::types::{RequestOrigin, ShareOutcome};

/// Share pages are personalised by host and protocol; never cache them.
fn no_store() -> [(HeaderName, &'static str); 3] {
    [
        (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

/// Value of `name` in a raw query string, still percent-encoded.
///
/// The resolver does the one and only decode, so the query form and the path
/// form of the same fragment resolve identically.
pub(super) fn raw_query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Run filesystem work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await?)
}

/// `GET /api/images`
pub(super) async fn images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GalleryIndex>, HttpError> {
    let index = blocking(move || build_index(state.share.root.images_root())).await?;
    Ok(Json(index))
}

/// `GET /image-page/*`
///
/// The fragment is taken from the raw path so that `%2F` survives routing.
pub(super) async fn share_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, HttpError> {
    let raw_fragment = uri
        .path()
        .strip_prefix(SHARE_PREFIX)
        .unwrap_or_default()
        .to_string();
    let raw_target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    let origin = request_origin(&headers, &uri, state.trust_proxy);
    debug!(fragment = %raw_fragment, user_agent = user_agent(&headers), "share page");

    let outcome =
        blocking(move || state.share.share_page(&raw_fragment, &raw_target, &origin)).await??;

    Ok(match outcome {
        ShareOutcome::Redirect(target) => {
            (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
        }
        ShareOutcome::Render(payload) => {
            (no_store(), Html(render_share_page(&payload).into_string())).into_response()
        }
    })
}

/// `GET /image?img=…`
pub(super) async fn fallback_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, HttpError> {
    let raw_fragment = uri
        .query()
        .and_then(|q| raw_query_param(q, "img"))
        .unwrap_or_default()
        .to_string();
    let origin = request_origin(&headers, &uri, state.trust_proxy);
    debug!(fragment = %raw_fragment, user_agent = user_agent(&headers), "fallback page");

    let payload = blocking(move || state.share.fallback_page(&raw_fragment, &origin)).await??;

    Ok((no_store(), Html(render_fallback_page(&payload).into_string())).into_response())
}

/// Host from the `Host` header, then the URI authority, then `localhost`.
/// The listener itself only speaks plain HTTP.
pub(super) fn request_origin(headers: &HeaderMap, uri: &Uri, trust_proxy: bool) -> RequestOrigin {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string());
    let origin = RequestOrigin::new(host, "http");

    let forwarded = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok());
    match forwarded {
        Some(proto) if trust_proxy => origin.with_forwarded_proto(proto),
        _ => origin,
    }
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn query_param_stays_encoded() {
        let query = "ref=x&img=images%2Fdaily%2Fsale%2541.jpg&img=second";
        assert_eq!(
            raw_query_param(query, "img"),
            Some("images%2Fdaily%2Fsale%2541.jpg")
        );
        assert_eq!(raw_query_param("img", "img"), Some(""));
        assert_eq!(raw_query_param("image=a.jpg", "img"), None);
        assert_eq!(raw_query_param("", "img"), None);
    }

    #[test]
    fn origin_from_host_header() {
        let origin = request_origin(
            &headers(&[("host", "gallery.test:3000")]),
            &Uri::from_static("/image-page/a.jpg"),
            true,
        );
        assert_eq!(origin.base_url(), "http://gallery.test:3000");
    }

    #[test]
    fn origin_falls_back_to_authority_then_localhost() {
        let origin = request_origin(
            &HeaderMap::new(),
            &Uri::from_static("http://cdn.test/image-page/a.jpg"),
            true,
        );
        assert_eq!(origin.host, "cdn.test");

        let origin = request_origin(&HeaderMap::new(), &Uri::from_static("/image"), true);
        assert_eq!(origin.host, "localhost");
    }

    #[test]
    fn forwarded_proto_only_when_trusted() {
        let h = headers(&[("host", "g.test"), ("x-forwarded-proto", "https")]);
        let uri = Uri::from_static("/image");

        assert_eq!(request_origin(&h, &uri, true).base_url(), "https://g.test");
        assert_eq!(request_origin(&h, &uri, false).base_url(), "http://g.test");
    }
}
