//! # Gallery Share
//!
//! A small image gallery server. The filesystem is the data source: two
//! collection directories (`daily` and `history`) hold one folder per album,
//! and every image in them gets a share page that unfurls properly in chat apps
//! and social networks.
//!
//! # Request Flows
//!
//! ```text
//! browse   GET /api/images           →  index   →  JSON
//! share    GET /image-page/{path}    →  share   →  render  →  HTML | 302 | 404
//! fallback GET /image?img={path}     →  share   →  render  →  HTML | 404
//! ```
//!
//! The two flows never exchange data; both read the same image root.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | Lists the two collections into a folder → files index |
//! | [`share`] | Decodes and contains untrusted path fragments, builds public URLs and sibling lists |
//! | [`render`] | Share and fallback pages with Open Graph and Twitter card tags, using Maud |
//! | [`server`] | axum routes, static file serving, request origin detection |
//! | [`config`] | `config.toml` loading, merging over stock defaults, and validation |
//! | [`types`] | Types shared between share, render and server (`RequestOrigin`, `SharePayload`) |
//! | [`output`] | CLI output formatting for `index` and `share` |
//!
//! # Design Decisions
//!
//! ## Containment Before Anything Else
//!
//! A share fragment comes straight from the URL. It is decoded, normalized and
//! checked against the image root by whole path segments before the filesystem
//! is asked anything, then checked again after symlinks are resolved. Every
//! failure is the same opaque 404, so probing reveals nothing about what exists
//! outside the root.
//!
//! ## Encoded Slashes Redirect
//!
//! Gallery links put the whole image path in one segment (`images%2Fdaily%2F…`).
//! Some crawlers and proxies mangle `%2F` in paths, so such requests are
//! redirected to the query form, which they leave alone.
//!
//! ## Maud Over Template Engines
//!
//! Pages are built with [Maud](https://maud.lambda.xyz/). Every value that
//! reaches the HTML, including the host header, goes through its escaping.

pub mod config;
pub mod index;
pub mod output;
pub mod render;
pub mod server;
pub mod share;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
