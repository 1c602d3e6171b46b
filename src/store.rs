//! Local animation library: a directory of `.lca` files.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::model::{Animation, AnimationKind, CatalogEntry};
use crate::raster::{self, ANIMATION_EXTENSION, RasterError};

/// A directory of stored animations, one container file each.
#[derive(Debug, Clone)]
pub struct Library {
    dir: PathBuf,
}

impl Library {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an animation with this name is stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{ANIMATION_EXTENSION}"))
    }

    /// List stored animations, sorted by name.
    ///
    /// Listing reads only file headers. Unreadable or corrupt entries
    /// are logged and skipped; one bad file must not hide the rest.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, RasterError> {
        fs::create_dir_all(&self.dir)?;

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ANIMATION_EXTENSION) {
                continue;
            }
            match raster::read_metadata(&path) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("skipping {}: {err}", path.display()),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Save an animation under its display name.
    ///
    /// The animation's path and size are stamped on success, and its
    /// kind becomes fixed now that it has raster backing.
    pub fn save(&self, animation: &mut Animation) -> Result<PathBuf, RasterError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(animation.display_name());
        let size = raster::encode_to_file(animation, &path)?;
        animation.path = Some(path.clone());
        animation.size = Some(size);
        animation.kind = AnimationKind::Fixed;
        Ok(path)
    }

    /// Load and fully decode a stored animation by name.
    pub fn load(&self, name: &str) -> Result<Animation, RasterError> {
        raster::read_animation(&self.path_for(name))
    }

    /// Delete a stored animation by name.
    pub fn remove(&self, name: &str) -> Result<(), RasterError> {
        fs::remove_file(self.path_for(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_save_list_load_remove_cycle() {
        let dir = tempdir().unwrap();
        let library = Library::new(dir.path());

        let mut unnamed = Animation::new();
        library.save(&mut unnamed).unwrap();

        let mut comet = Animation::new();
        comet.name = Some("Comet".into());
        comet.set_voxel(0, 1, 2, 3, Some(Rgb::new(255, 80, 0))).unwrap();
        let path = library.save(&mut comet).unwrap();
        assert_eq!(path, library.path_for("Comet"));

        let listed = library.entries().unwrap();
        let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Comet", "Unsaved"]);
        assert!(listed.iter().all(|e| e.kind == AnimationKind::Fixed));

        let loaded = library.load("Comet").unwrap();
        assert_eq!(loaded.frames(), comet.frames());
        assert_eq!(loaded.name.as_deref(), Some("Comet"));

        library.remove("Unsaved").unwrap();
        assert_eq!(library.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_save_stamps_backing_metadata() {
        let dir = tempdir().unwrap();
        let library = Library::new(dir.path());

        let mut animation = crate::generate::Pattern::default().generate();
        animation.name = Some("Sparks".into());
        assert_eq!(animation.kind, AnimationKind::Programmatic);

        library.save(&mut animation).unwrap();

        assert_eq!(animation.path, Some(library.path_for("Sparks")));
        assert!(animation.size.unwrap() > 0);
        assert_eq!(animation.kind, AnimationKind::Fixed);
    }

    #[test]
    fn test_entries_skip_corrupt_and_foreign_files() {
        let dir = tempdir().unwrap();
        let library = Library::new(dir.path());

        let mut good = Animation::new();
        good.name = Some("Good".into());
        library.save(&mut good).unwrap();

        std::fs::write(library.path_for("broken"), b"not a container").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"unrelated").unwrap();

        let listed = library.entries().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Good");
    }

    #[test]
    fn test_entries_create_missing_directory() {
        let dir = tempdir().unwrap();
        let library = Library::new(dir.path().join("animations"));

        assert!(library.entries().unwrap().is_empty());
        assert!(library.dir().is_dir());
    }
}
