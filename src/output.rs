//! CLI output formatting.
//!
//! Output is information-first: each entity leads with a positional index and
//! its name, with details on indented lines below.
//!
//! ## Index
//!
//! ```text
//! daily
//! 001 promotions (2 images)
//!     01.jpg
//!     02.png
//! history
//!     (no folders)
//! ```
//!
//! ## Share
//!
//! ```text
//! images/daily/promotions/01.jpg
//!     Image:    http://localhost:3000/images/daily/promotions/01.jpg
//!     Page:     http://localhost:3000/image-page/images%2Fdaily%2Fpromotions%2F01.jpg
//!     Fallback: http://localhost:3000/image?img=images%2Fdaily%2Fpromotions%2F01.jpg
//! Siblings
//!     001 /images/daily/promotions/01.jpg  ← current
//!     002 /images/daily/promotions/02.png
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::index::GalleryIndex;
use crate::share::ShareLinks;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn folder_header(index: usize, name: &str, count: usize) -> String {
    let noun = if count == 1 { "image" } else { "images" };
    format!("{} {} ({} {})", format_index(index), name, count, noun)
}

// ============================================================================
// Gallery index
// ============================================================================

/// Format the gallery index as a collection → folder → file tree.
///
/// Folders and files are listed in index order, which is directory order.
pub fn format_index_output(index: &GalleryIndex) -> Vec<String> {
    let mut lines = Vec::new();

    for (name, collection) in index.collections() {
        lines.push(name.to_string());
        if collection.is_empty() {
            lines.push(format!("{}(no folders)", indent(1)));
            continue;
        }
        for (i, folder) in collection.folders.iter().enumerate() {
            lines.push(folder_header(i + 1, &folder.name, folder.files.len()));
            for file in &folder.files {
                lines.push(format!("{}{}", indent(1), file));
            }
        }
    }

    lines
}

pub fn print_index_output(index: &GalleryIndex) {
    for line in format_index_output(index) {
        println!("{}", line);
    }
}

// ============================================================================
// Share links
// ============================================================================

/// Format the links derived for one image.
pub fn format_share_output(relative_path: &str, links: &ShareLinks) -> Vec<String> {
    let mut lines = vec![
        relative_path.to_string(),
        format!("{}Image:    {}", indent(1), links.image_url),
        format!("{}Page:     {}", indent(1), links.page_url),
        format!("{}Fallback: {}", indent(1), links.fallback_query_url),
        "Siblings".to_string(),
    ];

    for (i, url) in links.sibling_urls.iter().enumerate() {
        let marker = if links.current_index == Some(i) {
            "  \u{2190} current"
        } else {
            ""
        };
        lines.push(format!("{}{} {}{}", indent(1), format_index(i + 1), url, marker));
    }

    lines
}

pub fn print_share_output(relative_path: &str, links: &ShareLinks) {
    for line in format_share_output(relative_path, links) {
        println!("{}", line);
    }
}
