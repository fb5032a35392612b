//! HTTP surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/images` | gallery index as JSON |
//! | `GET /image-page/*` | share page, `302` to the query form, or `404` |
//! | `GET /image?img=…` | share page without redirect, or `404` |
//! | `GET /{images_dir}/…` | image files, revalidated on every use |
//! | anything else | static front end from `{public_dir}` |
//!
//! State is built once at startup and shared read-only behind an `Arc`.
//! Handlers do their filesystem work on the blocking pool.

pub mod error;
mod handlers;

pub use error::{HttpError, ServeError};

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::SiteConfig;
use crate::share::{ImageRoot, ShareContext};

pub(crate) const SHARE_PREFIX: &str = "/image-page/";

const IMAGE_CACHE_CONTROL: &str = "public, max-age=0, must-revalidate";

/// Everything a handler needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub share: ShareContext,
    pub trust_proxy: bool,
    /// URL path the image root is mounted at, e.g. `/images`.
    pub images_mount: String,
    pub public_root: PathBuf,
}

impl AppState {
    /// Build state for the content root at `root`.
    pub fn new(root: &Path, config: &SiteConfig) -> Result<Self, ServeError> {
        let images_dir = Path::new(&config.images_dir);
        let image_root = ImageRoot::new(root, images_dir)?;
        if !image_root.images_root().is_dir() {
            warn!(path = %image_root.images_root().display(), "image root does not exist");
        }

        Ok(Self {
            share: ShareContext::new(image_root, config.share.clone()),
            trust_proxy: config.server.trust_proxy,
            images_mount: mount_path(images_dir),
            public_root: root.join(&config.public_dir),
        })
    }
}

/// `images/daily` → `/images/daily`, with `/` separators on every platform.
fn mount_path(dir: &Path) -> String {
    let segments: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// The application router.
pub fn router(state: Arc<AppState>) -> Router {
    let images = SetResponseHeader::overriding(
        ServeDir::new(state.share.root.images_root()),
        header::CACHE_CONTROL,
        HeaderValue::from_static(IMAGE_CACHE_CONTROL),
    );
    let public = ServeDir::new(&state.public_root);
    let images_mount = state.images_mount.clone();

    Router::new()
        .route("/api/images", get(handlers::images))
        .route("/image-page/", get(handlers::share_page))
        .route("/image-page/*fragment", get(handlers::share_page))
        .route("/image", get(handlers::fallback_page))
        .with_state(state)
        .nest_service(&images_mount, images)
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C.
///
/// The config is validated again here, after any CLI overrides.
pub async fn serve(root: &Path, config: &SiteConfig) -> Result<(), ServeError> {
    config.validate()?;
    let state = Arc::new(AppState::new(root, config)?);
    info!(
        images = %state.share.root.images_root().display(),
        public = %state.public_root.display(),
        "serving gallery"
    );
    let app = router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => error!("could not listen for Ctrl-C: {err}"),
    }
}
