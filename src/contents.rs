//! File inventory of an extracted container image.
//!
//! An image saved with `docker save` and unpacked has one directory per
//! layer, named by the layer digest. Files found under such a directory are
//! reported relative to the layer root together with the layer hash; other
//! files are reported relative to the image root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::model::Location;

/// Length of a hex-encoded sha256 layer digest.
const LAYER_HASH_LEN: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct ImageContents {
    files: Vec<Location>,
}

impl ImageContents {
    /// Walks `root` and records every regular file.
    ///
    /// Unreadable directory entries are skipped.
    pub fn collect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut files = Vec::new();

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            files.push(locate(&root, entry.path()));
        }

        tracing::debug!(root = %root.display(), files = files.len(), "Collected image contents");

        Self { files }
    }

    pub fn files(&self) -> &[Location] {
        &self.files
    }

    /// Files whose name is exactly `name`.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Location> + 'a {
        self.files.iter().filter(move |f| f.file_name() == Some(name))
    }

    /// Files whose layer-relative path ends with `suffix`.
    pub fn ending_with<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Location> + 'a {
        self.files.iter().filter(move |f| f.path.ends_with(suffix))
    }
}

/// Splits a path into its layer hash and layer-relative part.
pub fn locate(root: &Path, path: &Path) -> Location {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut components = relative.components();

    if let Some(first) = components.next() {
        let first = first.as_os_str().to_string_lossy();
        let rest = components.as_path();
        if is_layer_hash(&first) && !rest.as_os_str().is_empty() {
            return Location::new(to_slash(rest), path.to_path_buf()).with_layer(first);
        }
    }

    Location::new(to_slash(relative), path.to_path_buf())
}

fn is_layer_hash(s: &str) -> bool {
    s.len() == LAYER_HASH_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LAYER: &str = "69a15d957a7a6f77e3fe31f330da5f4b6b582f228917a713a7a9e59449a3f413";

    #[test]
    fn test_locate_inside_layer() {
        let root = Path::new("/tmp/image");
        let path = root.join(LAYER).join("var").join("lib").join("rpm").join("Packages");
        let location = locate(root, &path);

        assert_eq!(location.path, "var/lib/rpm/Packages");
        assert_eq!(location.layer_hash.as_deref(), Some(LAYER));
        assert_eq!(location.real_path, path);
    }

    #[test]
    fn test_locate_outside_layer() {
        let root = Path::new("/tmp/image");
        let location = locate(root, &root.join("app").join("conanfile.txt"));

        assert_eq!(location.path, "app/conanfile.txt");
        assert!(location.layer_hash.is_none());
    }

    #[test]
    fn test_collect_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        let layer = dir.path().join(LAYER);
        fs::create_dir_all(layer.join("srv")).unwrap();
        fs::write(layer.join("srv").join("mix.lock"), "%{}").unwrap();
        fs::write(dir.path().join("manifest.json"), "[]").unwrap();

        let contents = ImageContents::collect(dir.path());

        assert_eq!(contents.files().len(), 2);
        assert_eq!(contents.named("mix.lock").count(), 1);
        assert_eq!(contents.named("rebar.lock").count(), 0);
        assert_eq!(contents.ending_with("srv/mix.lock").count(), 1);
    }

    #[test]
    fn test_collect_missing_root_is_empty() {
        let contents = ImageContents::collect("/definitely/not/here");
        assert!(contents.files().is_empty());
    }
}
