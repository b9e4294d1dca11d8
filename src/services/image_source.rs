use image::DynamicImage;
use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Photo taken from the source, still encoded
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn decode(&self) -> Result<DynamicImage, String> {
        image::load_from_memory(&self.bytes)
            .map_err(|e| format!("Failed to decode image '{}': {}", self.file_name, e))
    }
}

/// Collects photos from a ZIP archive or a directory, sorted by file name
pub struct ImageSource {
    extensions: Vec<String>,
}

impl ImageSource {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Load every accepted image below `path` (ZIP file or directory)
    pub fn load(&self, path: &Path) -> Result<Vec<SourceImage>, String> {
        if path.is_dir() {
            return self.read_directory(path);
        }

        let file = File::open(path)
            .map_err(|e| format!("Failed to open archive {}: {}", path.display(), e))?;
        self.read_archive(file)
    }

    /// Read accepted images from a ZIP archive
    pub fn read_archive<R: Read + Seek>(&self, reader: R) -> Result<Vec<SourceImage>, String> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| format!("Failed to read ZIP archive: {}", e))?;

        let mut images = Vec::new();
        for idx in 0..archive.len() {
            let mut entry = archive
                .by_index(idx)
                .map_err(|e| format!("Failed to read archive entry {}: {}", idx, e))?;

            if entry.is_dir() {
                continue;
            }

            let full_name = entry.name().to_string();
            // macOS resource forks
            if full_name.starts_with("__MACOSX/") {
                continue;
            }

            let file_name = full_name.rsplit('/').next().unwrap_or(&full_name).to_string();
            if !self.is_image(&file_name) {
                debug!("[ImageSource] Skipping non-image entry: {}", full_name);
                continue;
            }

            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| format!("Failed to extract '{}': {}", full_name, e))?;

            images.push(SourceImage { file_name, bytes });
        }

        Self::sort(&mut images);
        Ok(images)
    }

    fn read_directory(&self, dir: &Path) -> Result<Vec<SourceImage>, String> {
        let entries = fs::read_dir(dir)
            .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut images = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !self.is_image(&file_name) {
                continue;
            }

            let bytes = fs::read(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            images.push(SourceImage { file_name, bytes });
        }

        Self::sort(&mut images);
        Ok(images)
    }

    fn is_image(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    fn sort(images: &mut [SourceImage]) {
        images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }
}
