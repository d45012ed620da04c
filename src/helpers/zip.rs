//! ZIP archive helper utilities for Excel (.xlsx) packages
//! Provides convenient methods for accessing and writing files within ZIP archives

use crate::error::RefineryError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

/// Helper trait for ZIP archive operations with specialized reader creation
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, RefineryError>;

    /// Creates an XML reader for a file within the ZIP archive
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, RefineryError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    /// Gets a file from the ZIP archive by name with case-insensitive matching
    /// and path separator normalization (backslash to forward slash)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, RefineryError> {
        let pattern = name.replace('\\', "/");
        let path = self.file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(*file_name))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, RefineryError> {
        let reader = self
            .file(name)?
            .map(|file| XmlReader::new(BufReader::new(file)));
        Ok(reader)
    }
}

/// In-memory ZIP package builder with deflate compression
pub(crate) struct ZipPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipPackage {
    pub(crate) fn new() -> ZipPackage {
        ZipPackage {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a file entry with the given content
    pub(crate) fn add(&mut self, name: &str, content: &[u8]) -> Result<(), RefineryError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(name, options)?;
        self.writer.write_all(content)?;
        Ok(())
    }

    /// Writes the central directory and returns the archive bytes
    pub(crate) fn finish(self) -> Result<Vec<u8>, RefineryError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_entries_are_found_case_insensitively() {
        let mut package = ZipPackage::new();
        package.add("xl/workbook.xml", b"<workbook/>").unwrap();
        let bytes = package.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .file("XL\\Workbook.xml")
            .unwrap()
            .expect("entry exists")
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<workbook/>");
        assert!(archive.file("xl/missing.xml").unwrap().is_none());
    }
}
