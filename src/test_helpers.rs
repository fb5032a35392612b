//! Shared test utilities.
//!
//! Provides a throwaway gallery tree and lookup helpers that panic with the
//! available names on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = gallery_fixture();
//! let root = image_root(&tmp);
//! let resource = root.resolve("images/daily/spring/a.png").unwrap();
//!
//! let index = build_index(root.images_root());
//! assert_eq!(sorted_files(&index.daily, "spring"), ["a.png", "b.jpg", "c.gif"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::index::{Collection, Folder};
use crate::share::ImageRoot;

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a content root in a temp directory:
///
/// ```text
/// images/daily/spring/{b.jpg, a.png, c.gif, notes.txt, nested/}
/// images/history/summer/{photo.jpg, notes.txt}
/// images-sibling/x.jpg     # shares the "images" prefix, outside the root
/// secret.txt               # outside the root
/// ```
pub fn gallery_fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_files(
        &root.join("images/daily/spring"),
        &["b.jpg", "a.png", "c.gif", "notes.txt"],
    );
    fs::create_dir_all(root.join("images/daily/spring/nested")).unwrap();
    write_files(&root.join("images/history/summer"), &["photo.jpg", "notes.txt"]);
    write_files(&root.join("images-sibling"), &["x.jpg"]);
    write_files(root, &["secret.txt"]);

    tmp
}

/// Create `dir` and write each named file into it. Content is the file name.
pub fn write_files(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
}

/// The `images` root of a fixture.
pub fn image_root(tmp: &TempDir) -> ImageRoot {
    ImageRoot::new(tmp.path(), Path::new("images")).unwrap()
}

// =========================================================================
// Index lookups, panicking with a clear message on miss
// =========================================================================

/// Find a folder by name. Panics if not found.
pub fn find_folder<'a>(collection: &'a Collection, name: &str) -> &'a Folder {
    collection
        .folders
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = collection.folders.iter().map(|f| f.name.as_str()).collect();
            panic!("folder '{name}' not found. Available: {names:?}")
        })
}

/// A folder's files, sorted. Enumeration order is platform-dependent.
pub fn sorted_files<'a>(collection: &'a Collection, name: &str) -> Vec<&'a str> {
    let mut files: Vec<&str> = find_folder(collection, name)
        .files
        .iter()
        .map(String::as_str)
        .collect();
    files.sort();
    files
}
