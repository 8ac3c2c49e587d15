// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image sources — a uniform read-only view over files in a folder and
// in-memory uploads.

use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use pagebinder_core::error::Result;
use pagebinder_core::types::{ImageType, SourceKind};
use tracing::{debug, info, instrument};

/// A named file inside a directory.
#[derive(Debug, Clone)]
pub struct FolderEntry {
    path: PathBuf,
    name: String,
}

impl FolderEntry {
    /// Wrap a file path. The identifier is the file name.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An image handed over as bytes, with no filesystem backing.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    name: String,
    bytes: Arc<[u8]>,
}

impl UploadedImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Image type declared by the upload's file name.
    pub fn declared_type(&self) -> Option<ImageType> {
        ImageType::from_file_name(&self.name)
    }
}

/// One candidate image, regardless of where it is stored.
///
/// Two sources with the same identifier are the same logical item: equality
/// and hashing look at the identifier only. Cloning is cheap; upload bytes are
/// shared.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Folder(FolderEntry),
    Upload(UploadedImage),
}

impl ImageSource {
    /// A file on disk.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::Folder(FolderEntry::new(path))
    }

    /// An in-memory upload.
    pub fn upload(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Upload(UploadedImage::new(name, bytes))
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Folder(entry) => &entry.name,
            Self::Upload(upload) => &upload.name,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Folder(_) => SourceKind::Folder,
            Self::Upload(_) => SourceKind::Upload,
        }
    }

    /// Open a fresh byte stream over the image. Uploads can be opened any
    /// number of times.
    pub fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        match self {
            Self::Folder(entry) => Ok(Box::new(File::open(&entry.path)?)),
            Self::Upload(upload) => Ok(Box::new(Cursor::new(Arc::clone(&upload.bytes)))),
        }
    }

    /// Read the whole source into memory.
    pub fn read_all(&self) -> std::io::Result<Vec<u8>> {
        let mut reader = self.open()?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Size in bytes, from metadata for files. Never decodes the image.
    pub fn size_bytes(&self) -> std::io::Result<u64> {
        match self {
            Self::Folder(entry) => Ok(std::fs::metadata(&entry.path)?.len()),
            Self::Upload(upload) => Ok(upload.bytes.len() as u64),
        }
    }

    /// Creation time, falling back to modification time where the platform
    /// does not record creation. `None` for uploads and unreadable files.
    pub fn created_at(&self) -> Option<SystemTime> {
        match self {
            Self::Folder(entry) => {
                let metadata = std::fs::metadata(&entry.path).ok()?;
                metadata.created().or_else(|_| metadata.modified()).ok()
            }
            Self::Upload(_) => None,
        }
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for ImageSource {}

impl Hash for ImageSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

/// List the supported images directly inside `dir` (not recursive).
///
/// Entries whose extension is not a supported image type are left out. The
/// order is whatever the filesystem returns; sort the result before use.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn scan_folder(dir: impl AsRef<Path>) -> Result<Vec<ImageSource>> {
    let mut sources = Vec::new();
    let mut ignored = 0usize;

    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ImageType::from_file_name)
            .is_some();
        if supported {
            sources.push(ImageSource::file(path));
        } else {
            debug!(path = %path.display(), "Skipping non-image entry");
            ignored += 1;
        }
    }

    info!(found = sources.len(), ignored, "Folder scanned");
    Ok(sources)
}
