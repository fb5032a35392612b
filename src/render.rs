//! HTML for share pages.
//!
//! ## Pages
//!
//! - **Share page** (`/image-page/…`): full-screen viewer with a thumbnail
//!   carousel of the sibling images, a save button and a copy-link button.
//! - **Fallback page** (`/image?img=…`): the same social-preview metadata with
//!   a minimal body. Crawlers only read the `<head>`.
//!
//! Both carry Open Graph and Twitter card tags built from [`SocialMeta`].
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time:
//! - `static/share.css`: viewer layout
//! - `static/share.js`: carousel and clipboard wiring
//!
//! Page data reaches the script through `data-*` attributes, so every
//! interpolated value goes through Maud's escaping.

use crate::types::{SharePayload, SocialMeta};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/share.css");
const JS: &str = include_str!("../static/share.js");

const SAVE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="white"><path d="M5 20h14v-2H5v2zm7-18L5.33 9h3.84v6h6.66V9h3.84L12 2z"/></svg>"#;
const COPY_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="18" height="18" viewBox="0 0 24 24" fill="white"><path d="M16 1H4c-1.1 0-2 .9-2 2v12h2V3h12V1zm3 4H8c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h11c1.1 0 2-.9 2-2V7c0-1.1-.9-2-2-2zm0 16H8V7h11v14z"/></svg>"#;

/// Open Graph and Twitter card tags.
fn social_meta(meta: &SocialMeta) -> Markup {
    html! {
        meta property="og:title" content=(meta.title);
        meta property="og:description" content=(meta.description);
        meta property="og:image" content=(meta.image_url);
        meta property="og:image:secure_url" content=(meta.image_url);
        meta name="twitter:image" content=(meta.image_url);
        meta property="og:url" content=(meta.page_url);
        meta property="og:type" content=(meta.og_type);
        meta name="twitter:card" content=(meta.card);
    }
}

fn head(meta: &SocialMeta, css: Option<&str>) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width,initial-scale=1";
            title { (meta.title) }
            (social_meta(meta))
            @if let Some(css) = css {
                style { (PreEscaped(css)) }
            }
        }
    }
}

/// Renders the full viewer page.
pub fn render_share_page(payload: &SharePayload) -> Markup {
    let images_json =
        serde_json::to_string(&payload.sibling_urls).unwrap_or_else(|_| "[]".to_string());

    html! {
        (DOCTYPE)
        html lang="en" {
            (head(&payload.meta, Some(CSS)))
            body {
                div.topbar {
                    a id="back-btn" href=(payload.home_url) { (PreEscaped("&#8592;")) }
                    a id="close-btn" href=(payload.home_url) { (PreEscaped("&#10005;")) }
                }
                div.main {
                    img id="bigimg" src=(payload.image_url) alt="Preview";
                }
                div.footer {
                    a id="save-link" class="icon-btn" href=(payload.image_url) download title="Save" {
                        (PreEscaped(SAVE_ICON))
                    }
                    div.thumb-viewport {
                        div id="thumb-strip" class="thumb-strip" role="list"
                            data-images=(images_json)
                            data-initial=(payload.initial_url) {}
                    }
                    a id="copy-link" class="icon-btn" href="#" title="Copy link" data-url=(payload.page_url) {
                        (PreEscaped(COPY_ICON))
                    }
                }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the metadata-only page for the query-string route.
pub fn render_fallback_page(payload: &SharePayload) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(&payload.meta, None))
            body {
                p { "This is a share page for an image." }
                p {
                    a href=(payload.image_url) { "Open the image" }
                }
            }
        }
    }
}
