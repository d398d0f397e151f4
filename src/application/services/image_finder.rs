//! Discovery of emote image files on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Extensions picked up by the uploader, in the order they are collected.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["png", "gif"];

/// Finds image files under `root`.
///
/// All `.png` files come first, then all `.gif` files. Within each group files
/// are in walk order, visiting directory entries sorted by name.
///
/// # Errors
/// Returns error if a directory cannot be read.
pub fn find_images(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, &mut files)?;

    let mut images = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        images.extend(
            files
                .iter()
                .filter(|path| path.extension().is_some_and(|e| e == ext))
                .cloned(),
        );
    }
    Ok(images)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, files)?;
        } else {
            trace!(path = %path.display(), "Found file");
            files.push(path);
        }
    }
    Ok(())
}
