// ============================================================
// Layer 4 - Training Folder Loader
// ============================================================
// Scans a training folder laid out as:
//
//   training/
//     Invasive Species/
//       img001.jpg
//       more/img002.png      ← nested folders are searched too
//     Native/
//       img101.jpg
//
// Every immediate sub-directory is a class. Class labels are
// the sorted directory names, so label index i is the same on
// every run over the same folder. Hidden entries are skipped.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §13 (Iterators)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::{
    labels::ClassLabels,
    sample::{LabeledImage, TrainingCorpus},
    traits::ImageSource,
};

/// Extensions accepted as training images (lower-case).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "ppm", "tif", "tiff"];

/// Loads labelled images from a folder of class folders.
/// Implements the ImageSource trait from Layer 3.
pub struct TrainingFolder {
    dir: PathBuf,
}

impl TrainingFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sorted names of the visible sub-directories.
    fn class_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut classes = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read training folder '{}'", self.dir.display()))?
        {
            let entry = entry?;
            let path  = entry.path();
            let name  = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !path.is_dir() {
                continue;
            }
            classes.push((name, path));
        }
        classes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(classes)
    }
}

impl ImageSource for TrainingFolder {
    fn load_all(&self) -> Result<TrainingCorpus> {
        if !self.dir.is_dir() {
            bail!("Training folder '{}' does not exist or is not a directory", self.dir.display());
        }

        let class_dirs = self.class_dirs()?;
        if class_dirs.is_empty() {
            bail!(
                "No class folders found in '{}'. Put each class's images in its own sub-folder.",
                self.dir.display()
            );
        }

        let mut names  = Vec::new();
        let mut images = Vec::new();

        for (name, path) in class_dirs {
            let mut files = Vec::new();
            collect_images(&path, &mut files)?;

            // A folder without images would be a class the model can never learn.
            if files.is_empty() {
                tracing::warn!("Class folder '{}' has no images - skipping", name);
                continue;
            }

            files.sort();
            let class_index = names.len();
            tracing::debug!("Class {} '{}': {} images", class_index, name, files.len());
            images.extend(files.into_iter().map(|p| LabeledImage::new(p, class_index)));
            names.push(name);
        }

        if images.is_empty() {
            bail!("No images found in the selected folder '{}'", self.dir.display());
        }

        tracing::info!("Found {} images in {} classes", images.len(), names.len());
        Ok(TrainingCorpus { labels: ClassLabels::new(names)?, images })
    }
}

/// Recursively collect image files below `dir`. Symlinked
/// directories are not followed, so a link back up the tree
/// cannot loop or count the same image twice.
fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let entry     = entry?;
        let path      = entry.path();
        let file_type = entry.file_type()?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if file_type.is_dir() {
            collect_images(&path, out)?;
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!("Not following directory link '{}'", path.display());
        } else if is_image(&path) {
            out.push(path);
        }
    }
    Ok(())
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"not really an image").unwrap();
    }

    #[test]
    fn test_labels_are_sorted_folder_names() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Native/a.jpg"));
        touch(&tmp.path().join("Invasive Species/b.PNG"));
        touch(&tmp.path().join("Invasive Species/nested/c.bmp"));
        touch(&tmp.path().join("Invasive Species/notes.txt"));

        let corpus = TrainingFolder::new(tmp.path()).load_all().unwrap();
        let labels: Vec<&str> = corpus.labels.iter().collect();
        assert_eq!(labels, vec!["Invasive Species", "Native"]);
        assert_eq!(corpus.class_counts(), vec![2, 1]);
    }

    #[test]
    fn test_hidden_and_empty_classes_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Native/a.jpg"));
        touch(&tmp.path().join(".cache/x.jpg"));
        fs::create_dir_all(tmp.path().join("Empty")).unwrap();
        touch(&tmp.path().join("loose.jpg"));

        let corpus = TrainingFolder::new(tmp.path()).load_all().unwrap();
        assert_eq!(corpus.labels.iter().collect::<Vec<_>>(), vec!["Native"]);
        assert_eq!(corpus.images[0].class_index, 0);
    }

    #[test]
    fn test_folder_without_images_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("Native")).unwrap();
        let err = TrainingFolder::new(tmp.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("No images found"));
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(TrainingFolder::new(tmp.path().join("nope")).load_all().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Native/a.png"));
        std::os::unix::fs::symlink(".", tmp.path().join("Native/loop")).unwrap();

        let corpus = TrainingFolder::new(tmp.path()).load_all().unwrap();
        assert_eq!(corpus.image_count(), 1);
    }

    #[test]
    fn test_is_image_extensions() {
        assert!(is_image(Path::new("leaf.JPEG")));
        assert!(is_image(Path::new("leaf.tif")));
        assert!(!is_image(Path::new("leaf.gif")));
        assert!(!is_image(Path::new("leaf")));
    }
}
