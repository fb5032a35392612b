//! Gallery indexing.
//!
//! Builds the browse data for the front page from two fixed collections under
//! the image root:
//!
//! ```text
//! images/                      # Image root
//! ├── daily/                   # Rotating collection, shown as tabs
//! │   ├── promotions/
//! │   │   ├── 01.jpg
//! │   │   └── 02.png
//! │   └── new-arrivals/
//! │       └── a.webp
//! └── history/                 # Archive, shown as folders
//!     └── 2024-summer/
//!         ├── photo.jpg
//!         └── notes.txt        # Ignored: not an image
//! ```
//!
//! ## Output
//!
//! Produces a [`GalleryIndex`] that serializes as
//! `{"daily": {"promotions": ["01.jpg", "02.png"], …}, "history": {…}}`.
//!
//! Folders and files keep directory-enumeration order, which is whatever the
//! OS returns. Callers that need a stable order must sort.
//!
//! ## Failure behavior
//!
//! Indexing never fails. A missing or unreadable collection becomes an empty
//! collection and is logged; the other collection is still indexed. Only two
//! levels are read: files directly in a collection and anything nested below
//! a folder are ignored.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Accepted image extensions, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

pub const DAILY: &str = "daily";
pub const HISTORY: &str = "history";

/// Snapshot of both collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GalleryIndex {
    pub daily: Collection,
    pub history: Collection,
}

impl GalleryIndex {
    /// Collections with their names, in display order.
    pub fn collections(&self) -> [(&'static str, &Collection); 2] {
        [(DAILY, &self.daily), (HISTORY, &self.history)]
    }
}

/// Folder name → image file names, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub files: Vec<String>,
}

impl Collection {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.folders
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.files.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.folders.len()))?;
        for folder in &self.folders {
            map.serialize_entry(&folder.name, &folder.files)?;
        }
        map.end()
    }
}

/// Index both collections under `images_root`.
pub fn build_index(images_root: &Path) -> GalleryIndex {
    GalleryIndex {
        daily: scan_collection(&images_root.join(DAILY)),
        history: scan_collection(&images_root.join(HISTORY)),
    }
}

fn scan_collection(root: &Path) -> Collection {
    let folders = match subdirectories(root) {
        Ok(dirs) => dirs,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %root.display(), "collection folder absent");
            return Collection::default();
        }
        Err(err) => {
            warn!(path = %root.display(), "could not read collection: {err}");
            return Collection::default();
        }
    };

    let folders = folders
        .into_iter()
        .map(|(name, path)| {
            let files = image_files(&path).unwrap_or_else(|err| {
                warn!(path = %path.display(), "could not read folder: {err}");
                Vec::new()
            });
            Folder { name, files }
        })
        .collect();

    Collection { folders }
}

fn subdirectories(path: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    Ok(entries(path)?
        .into_iter()
        .filter(|e| e.file_type.is_dir())
        .map(|e| (e.name, e.path))
        .collect())
}

fn image_files(path: &Path) -> io::Result<Vec<String>> {
    Ok(entries(path)?
        .into_iter()
        .filter(|e| e.file_type.is_file() && has_image_extension(&e.name))
        .map(|e| e.name)
        .collect())
}

struct Entry {
    name: String,
    path: PathBuf,
    /// Type of the entry itself; symlinks are neither files nor directories.
    file_type: fs::FileType,
}

/// Directory entries with UTF-8 names, in enumeration order.
fn entries(path: &Path) -> io::Result<Vec<Entry>> {
    Ok(fs::read_dir(path)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let file_type = e.file_type().ok()?;
            match e.file_name().into_string() {
                Ok(name) => Some(Entry {
                    name,
                    path: e.path(),
                    file_type,
                }),
                Err(raw) => {
                    debug!(name = ?raw, "skipping non UTF-8 entry");
                    None
                }
            }
        })
        .collect())
}

/// Whether a file name carries one of [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(name: &str) -> bool {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
