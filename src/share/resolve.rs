//! Turning an untrusted path fragment into a validated [`ResourceRef`].
//!
//! Every gate below must pass before the fragment is allowed anywhere near a
//! directory listing or a URL:
//!
//! ```text
//! raw fragment ──decode──▶ text ──normalize──▶ relative path
//!      ──join content root + normalize──▶ lexical absolute path
//!      ──segment containment (lexical)──▶
//!      ──canonicalize root and target, containment again──▶
//!      ──regular file?──▶ ResourceRef
//! ```
//!
//! Containment is checked twice. The lexical check rejects `..` escapes and
//! sibling directories that merely share the root's name as a string prefix
//! (`images-evil` vs `images`). The canonical check rejects symlinks that
//! point out of the root. Every failure is the same opaque
//! [`ResolveError::NotFound`].

use super::encoding::decode_or_raw;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Image not found")]
    NotFound,
}

/// A validated image inside the image root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Path segments relative to the content root, starting with the image
    /// directory (e.g. `["images", "daily", "spring", "a.png"]`).
    pub root_relative_path: Vec<String>,
    /// Lexically normalized absolute path, as addressed by the client.
    pub absolute_path: PathBuf,
    /// Real path of the file after symlink resolution.
    pub canonical_path: PathBuf,
    /// Directory holding `absolute_path`.
    pub containing_folder: PathBuf,
}

impl ResourceRef {
    /// Slash-joined relative path, e.g. `images/daily/spring/a.png`.
    pub fn relative_path(&self) -> String {
        self.root_relative_path.join("/")
    }

    /// Segments of the containing folder relative to the content root.
    pub fn folder_segments(&self) -> &[String] {
        let len = self.root_relative_path.len();
        &self.root_relative_path[..len.saturating_sub(1)]
    }

    pub fn file_name(&self) -> &str {
        self.root_relative_path
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// The content root and the image root beneath it.
///
/// Share URLs are relative to the content root (so they carry the image
/// directory name); only paths under the image root are ever resolved.
#[derive(Debug, Clone)]
pub struct ImageRoot {
    content_root: PathBuf,
    images_root: PathBuf,
}

impl ImageRoot {
    /// Build from a content root and an image directory relative to it.
    ///
    /// The content root is made absolute against the current directory; it
    /// does not need to exist yet.
    pub fn new(content_root: &Path, images_dir: &Path) -> io::Result<Self> {
        let content_root = lexical_normalize(&std::path::absolute(content_root)?);
        let images_root = lexical_normalize(&content_root.join(images_dir));
        Ok(Self {
            content_root,
            images_root,
        })
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    /// Resolve a raw, still percent-encoded fragment to an image file.
    pub fn resolve(&self, raw_fragment: &str) -> Result<ResourceRef, ResolveError> {
        let decoded = decode_or_raw(raw_fragment);
        debug!(raw = raw_fragment, decoded = %decoded, "resolving fragment");

        let normalized = lexical_normalize(Path::new(decoded.as_ref()));
        let absolute = lexical_normalize(&self.content_root.join(&normalized));

        if !is_within(&self.images_root, &absolute) {
            debug!(path = %absolute.display(), "rejected: outside image root");
            return Err(ResolveError::NotFound);
        }

        let canonical_root = fs::canonicalize(&self.images_root).map_err(|err| {
            debug!(root = %self.images_root.display(), "image root unavailable: {err}");
            ResolveError::NotFound
        })?;
        let canonical = fs::canonicalize(&absolute).map_err(|_| ResolveError::NotFound)?;
        if !is_within(&canonical_root, &canonical) {
            debug!(path = %canonical.display(), "rejected: real path escapes image root");
            return Err(ResolveError::NotFound);
        }

        let metadata = fs::metadata(&canonical).map_err(|_| ResolveError::NotFound)?;
        if !metadata.is_file() {
            debug!(path = %canonical.display(), "rejected: not a regular file");
            return Err(ResolveError::NotFound);
        }

        let relative = absolute
            .strip_prefix(&self.content_root)
            .map_err(|_| ResolveError::NotFound)?;
        let root_relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .ok_or(ResolveError::NotFound)?;
        let containing_folder = absolute
            .parent()
            .map(Path::to_path_buf)
            .ok_or(ResolveError::NotFound)?;

        Ok(ResourceRef {
            root_relative_path,
            absolute_path: absolute,
            canonical_path: canonical,
            containing_folder,
        })
    }
}

/// True when `path` is `root` or lies beneath it by whole path segments.
///
/// `Path::starts_with` compares components, so `/srv/images-evil` is not
/// within `/srv/images`.
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}

/// Collapse `.`, `..` and repeated separators without touching the disk.
///
/// `..` at the start of a relative path is kept; `..` directly under the
/// filesystem root is dropped, as there is nothing above it.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }
    out
}
