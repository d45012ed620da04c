use crate::error::RefineryError;
use crate::error::ResultMessage;
use std::path::Path;

/// A file handed to the refinery: its name and raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, keeping only its file name.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<UploadedFile, RefineryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_prefix(&path.display().to_string())?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadedFile::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased extension with its leading dot, or empty when there is none.
    /// Leading dots of a hidden file name are not an extension.
    pub fn extension(&self) -> String {
        let stem = self.file_stem_start();
        match stem.rfind('.') {
            Some(index) => stem[index..].to_ascii_lowercase(),
            None => String::new(),
        }
    }

    /// File name without its extension.
    pub fn base_name(&self) -> &str {
        let stem = self.file_stem_start();
        let offset = self.name.len() - stem.len();
        match stem.rfind('.') {
            Some(index) => &self.name[..offset + index],
            None => &self.name,
        }
    }

    fn file_stem_start(&self) -> &str {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name);
        base.trim_start_matches('.')
    }
}
