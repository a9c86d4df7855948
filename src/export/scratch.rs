//! Scratch Directory
//!
//! Per-activation folder under the platform temp dir that receives the
//! exported images. Emptied every time the extension activates.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ViewerResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// `<temp dir>/<dir_name>`, emptied or created
    pub fn prepare(dir_name: &str) -> ViewerResult<Self> {
        Self::at(std::env::temp_dir().join(dir_name))
    }

    /// Use an explicit folder, emptied or created
    pub fn at(path: impl Into<PathBuf>) -> ViewerResult<Self> {
        let scratch = Self { path: path.into() };
        if scratch.path.exists() {
            let removed = scratch.clean()?;
            debug!("Removed {} stale files from {:?}", removed, scratch.path);
        } else {
            fs::create_dir_all(&scratch.path)?;
            info!("Created scratch directory {:?}", scratch.path);
        }
        Ok(scratch)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the files directly inside the folder. Sub folders are left alone.
    pub fn clean(&self) -> ViewerResult<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove {:?}: {}", entry.path(), e),
            }
        }
        Ok(removed)
    }

    /// `<scratch>/<name>.png`
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.png", name))
    }

    /// Image path for an arbitrary expression such as `frames[0].img`
    pub fn tracked_image_path(&self, expression: &str) -> PathBuf {
        let file_stem: String = expression
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        self.image_path(&format!("tracked_{}", file_stem))
    }

    /// Path as written inside a Python string literal: forward slashes only
    pub fn save_path(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_empties_existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("svifpod");
        fs::create_dir_all(target.join("keep")).unwrap();
        fs::write(target.join("old.png"), b"x").unwrap();
        fs::write(target.join("older.png"), b"y").unwrap();

        let scratch = ScratchDir::at(&target).unwrap();
        assert!(!target.join("old.png").exists());
        assert!(!target.join("older.png").exists());
        assert!(target.join("keep").is_dir());
        assert_eq!(scratch.path(), target.as_path());
    }

    #[test]
    fn test_prepare_creates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("svifpod");
        ScratchDir::at(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_paths() {
        let scratch = ScratchDir { path: PathBuf::from("/tmp/svifpod") };
        assert_eq!(scratch.image_path("img"), PathBuf::from("/tmp/svifpod/img.png"));
        assert_eq!(
            scratch.tracked_image_path("frames[0].img"),
            PathBuf::from("/tmp/svifpod/tracked_frames_0__img.png")
        );
        assert_eq!(
            ScratchDir::save_path(Path::new(r"C:\Temp\svifpod\img.png")),
            "C:/Temp/svifpod/img.png"
        );
    }
}
