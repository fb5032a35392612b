//! Share pages: from a raw path fragment to a render payload or a redirect.
//!
//! A share request moves through fixed states; any gate can end it:
//!
//! ```text
//! RECEIVED → DECODED → NORMALIZED → CONTAINMENT-CHECKED ─┬─▶ REJECTED (404)
//!                                                        └─▶ RESOLVED ─┬─▶ REDIRECTED (302)
//!                                                                      └─▶ RENDERED (200)
//! ```
//!
//! Decoding, normalization and containment live in [`resolve`]; URL building
//! in [`links`]; the percent-encoding rules both rely on in [`encoding`].
//!
//! ## Encoded slashes
//!
//! The gallery links to `/image-page/images%2Fdaily%2F…`. Some crawlers and
//! proxies rewrite or refuse `%2F` inside a path, so a resolved request whose
//! raw target still contains `%2F` is redirected to the query form
//! `/image?img=…`, which they pass through untouched. The raw check happens on
//! the undecoded target; decoding happens afterwards and separately.

pub mod encoding;
pub mod links;
pub mod resolve;

pub use links::{ShareLinks, build_links};
pub use resolve::{ImageRoot, ResolveError, ResourceRef};

use crate::config::ShareConfig;
use crate::types::{RequestOrigin, ShareOutcome, SharePayload, SocialMeta};
use tracing::info;

/// The literal marker that triggers the query-string fallback.
const ENCODED_SLASH: &str = "%2F";

/// Per-process share settings, built once at startup.
#[derive(Debug, Clone)]
pub struct ShareContext {
    pub root: ImageRoot,
    pub meta: ShareConfig,
}

impl ShareContext {
    pub fn new(root: ImageRoot, meta: ShareConfig) -> Self {
        Self { root, meta }
    }

    /// Handle `/image-page/{fragment}`.
    ///
    /// `raw_target` is the request target exactly as received (path and
    /// query, still encoded). Resolution failures are returned before the
    /// redirect decision, so an unresolvable `%2F` path is a 404, not a 302.
    pub fn share_page(
        &self,
        raw_fragment: &str,
        raw_target: &str,
        origin: &RequestOrigin,
    ) -> Result<ShareOutcome, ResolveError> {
        let resource = self.root.resolve(raw_fragment)?;

        if raw_target.contains(ENCODED_SLASH) {
            let target = links::fallback_target(&resource.relative_path());
            info!(%target, "redirecting encoded-slash request");
            return Ok(ShareOutcome::Redirect(target));
        }

        let links = build_links(&resource, origin);
        Ok(ShareOutcome::Render(self.payload(&resource, links, origin, false)))
    }

    /// Handle `/image?img={fragment}`. Never redirects.
    pub fn fallback_page(
        &self,
        raw_fragment: &str,
        origin: &RequestOrigin,
    ) -> Result<SharePayload, ResolveError> {
        let resource = self.root.resolve(raw_fragment)?;
        let links = build_links(&resource, origin);
        Ok(self.payload(&resource, links, origin, true))
    }

    fn payload(
        &self,
        resource: &ResourceRef,
        links: ShareLinks,
        origin: &RequestOrigin,
        query_form: bool,
    ) -> SharePayload {
        let page_url = if query_form {
            links.fallback_query_url
        } else {
            links.page_url
        };
        SharePayload {
            meta: SocialMeta {
                title: self.meta.title.clone(),
                description: self.meta.description.clone(),
                image_url: links.image_url.clone(),
                page_url: page_url.clone(),
                card: self.meta.card.clone(),
                og_type: self.meta.og_type.clone(),
            },
            image_url: links.image_url,
            page_url,
            sibling_urls: links.sibling_urls,
            current_index: links.current_index,
            initial_url: links::root_relative_url(resource),
            home_url: origin.base_url(),
        }
    }
}
