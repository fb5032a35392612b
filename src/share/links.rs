//! Public URLs for a resolved image and its carousel siblings.

use super::encoding::{encode_component, encode_path};
use super::resolve::ResourceRef;
use crate::index::has_image_extension;
use crate::types::RequestOrigin;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Links derived for one image. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    /// `{proto}://{host}/images/daily/a.png`, slashes kept.
    pub image_url: String,
    /// `{proto}://{host}/image-page/images%2Fdaily%2Fa.png`
    pub page_url: String,
    /// `{proto}://{host}/image?img=images%2Fdaily%2Fa.png`
    pub fallback_query_url: String,
    /// Root-relative URLs of the image files next to this one, sorted by name.
    pub sibling_urls: Vec<String>,
    /// Position of this image in `sibling_urls`.
    pub current_index: Option<usize>,
}

pub fn build_links(resource: &ResourceRef, origin: &RequestOrigin) -> ShareLinks {
    let base = origin.base_url();
    let relative = resource.relative_path();

    let names = list_siblings(&resource.containing_folder).unwrap_or_else(|err| {
        warn!(
            folder = %resource.containing_folder.display(),
            "could not list sibling images: {err}"
        );
        vec![resource.file_name().to_string()]
    });

    let folder = resource.folder_segments().join("/");
    let sibling_urls = names
        .iter()
        .map(|name| format!("/{}", encode_path(&format!("{folder}/{name}"))))
        .collect();
    let current_index = names.iter().position(|name| name == resource.file_name());

    ShareLinks {
        image_url: format!("{base}/{}", encode_path(&relative)),
        page_url: format!("{base}/image-page/{}", encode_component(&relative)),
        fallback_query_url: format!("{base}{}", fallback_target(&relative)),
        sibling_urls,
        current_index,
    }
}

/// Root-relative query-string route for a relative image path.
pub fn fallback_target(relative_path: &str) -> String {
    format!("/image?img={}", encode_component(relative_path))
}

/// Root-relative URL of the image file itself.
pub fn root_relative_url(resource: &ResourceRef) -> String {
    format!("/{}", encode_path(&resource.relative_path()))
}

/// Image file names directly inside `folder`, in byte order.
///
/// Symlinks are skipped: they would be listed but then fail resolution.
pub fn list_siblings(folder: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| has_image_extension(name))
        .collect();
    names.sort();
    Ok(names)
}
