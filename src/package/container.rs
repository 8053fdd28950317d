//! Container transaction over an OpenDocument ZIP package
//!
//! Entries are read by name; committing writes a new package in which every
//! entry that was not replaced is raw-copied (compressed bytes, header data
//! and order unchanged).

use crate::error::{Error, Result};
use crate::package::{well_known, EntryPath};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::read::ZipArchive;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Replacement bytes keyed by entry path
pub type Replacements = BTreeMap<EntryPath, Vec<u8>>;

/// An open package
#[derive(Debug)]
pub struct Container<R> {
    /// Source path, when opened from disk
    path: Option<PathBuf>,
    archive: ZipArchive<R>,
}

impl Container<BufReader<File>> {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ContainerNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| Error::ContainerCorrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!("opened {} ({} entries)", path.display(), archive.len());

        Ok(Self {
            path: Some(path.to_path_buf()),
            archive,
        })
    }
}

impl Container<Cursor<Vec<u8>>> {
    /// Open a package held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Container<R> {
    /// Open a package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|e| Error::ContainerCorrupt {
            path: PathBuf::from("<memory>"),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: None,
            archive,
        })
    }

    /// Source path, if opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of entries, directories included
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the package has no entries at all
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entry names in archive order
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            names.push(self.archive.by_index_raw(i)?.name().to_string());
        }
        Ok(names)
    }

    /// Check whether an entry exists
    pub fn contains(&self, path: &EntryPath) -> bool {
        self.archive.index_for_name(path.as_str()).is_some()
    }

    /// Read the uncompressed bytes of an entry
    pub fn read_entry(&mut self, path: &EntryPath) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(path.as_str()) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(Error::EntryNotFound(path.to_string())),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read an entry that a package may legitimately lack
    pub fn read_optional_entry(&mut self, path: &EntryPath) -> Result<Option<Vec<u8>>> {
        match self.read_entry(path) {
            Ok(data) => Ok(Some(data)),
            Err(Error::EntryNotFound(_)) => {
                debug!("optional entry {} not present", path);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Contents of the `mimetype` entry, trimmed
    pub fn mimetype(&mut self) -> Result<Option<String>> {
        Ok(self
            .read_optional_entry(&well_known::mimetype())?
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string()))
    }

    /// Write a new package into `output`, atomically.
    ///
    /// The package is staged in a temporary file next to `output` and only
    /// moved into place once fully written. On any failure the staging file
    /// is removed and `output` is left untouched.
    pub fn commit<P: AsRef<Path>>(
        &mut self,
        replacements: &Replacements,
        output: P,
    ) -> Result<()> {
        let output = output.as_ref();
        let write_error = |message: String| Error::Write {
            path: output.to_path_buf(),
            message,
        };

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staging = tempfile::Builder::new()
            .prefix(".odf-restyle-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| write_error(e.to_string()))?;

        let staging = self
            .write_to(replacements, staging)
            .map_err(|e| write_error(e.to_string()))?;
        staging
            .as_file()
            .sync_all()
            .map_err(|e| write_error(e.to_string()))?;
        staging
            .persist(output)
            .map_err(|e| write_error(e.error.to_string()))?;

        info!(
            "wrote {} ({} replaced entries)",
            output.display(),
            replacements.len()
        );
        Ok(())
    }

    /// Write a new package into a writer, returning the writer
    pub fn write_to<W: Write + Seek>(
        &mut self,
        replacements: &Replacements,
        writer: W,
    ) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let mut used: BTreeSet<&EntryPath> = BTreeSet::new();

        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            let name = entry.name().to_string();

            let replacement = EntryPath::new(&name)
                .ok()
                .and_then(|path| replacements.get_key_value(&path));

            match replacement {
                Some((path, bytes)) if !entry.is_dir() => {
                    let options =
                        SimpleFileOptions::default().compression_method(entry.compression());
                    drop(entry);

                    debug!("replacing {}", path);
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(bytes)?;
                    used.insert(path);
                }
                _ => zip.raw_copy_file(entry)?,
            }
        }

        for (path, bytes) in replacements {
            if used.contains(path) {
                continue;
            }
            debug!("adding new entry {}", path);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(path.as_str(), options)?;
            zip.write_all(bytes)?;
        }

        Ok(zip.finish()?)
    }

    /// Write a new package to bytes
    pub fn to_bytes(&mut self, replacements: &Replacements) -> Result<Vec<u8>> {
        let cursor = self.write_to(replacements, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_package() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored).unwrap();
        zip.write_all(b"application/vnd.oasis.opendocument.text").unwrap();
        zip.start_file("content.xml", deflated).unwrap();
        zip.write_all(b"<office:document-content/>").unwrap();
        zip.add_directory("Pictures/", deflated).unwrap();
        zip.start_file("Pictures/img1.png", stored).unwrap();
        zip.write_all(&[0x89, b'P', b'N', b'G', 0, 1, 2, 3]).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_entry() {
        let mut container = Container::from_bytes(sample_package()).unwrap();
        let data = container.read_entry(&well_known::content()).unwrap();
        assert_eq!(data, b"<office:document-content/>");
        assert_eq!(
            container.mimetype().unwrap().as_deref(),
            Some("application/vnd.oasis.opendocument.text")
        );
    }

    #[test]
    fn test_missing_entry() {
        let mut container = Container::from_bytes(sample_package()).unwrap();
        let err = container.read_entry(&well_known::styles()).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(ref p) if p == "styles.xml"));
        assert!(container
            .read_optional_entry(&well_known::meta())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupt_container() {
        let err = Container::from_bytes(b"not a zip".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ContainerCorrupt { .. }));
    }

    #[test]
    fn test_missing_container() {
        let err = Container::open("/definitely/not/here.odt").unwrap_err();
        assert!(matches!(err, Error::ContainerNotFound(_)));
    }

    #[test]
    fn test_replace_keeps_order_and_other_bytes() {
        let mut container = Container::from_bytes(sample_package()).unwrap();
        let mut replacements = Replacements::new();
        replacements.insert(well_known::content(), b"<new/>".to_vec());

        let out = container.to_bytes(&replacements).unwrap();
        let mut rewritten = Container::from_bytes(out).unwrap();

        assert_eq!(
            rewritten.entry_names().unwrap(),
            container.entry_names().unwrap()
        );
        assert_eq!(
            rewritten.read_entry(&well_known::content()).unwrap(),
            b"<new/>"
        );
        let img = EntryPath::new("Pictures/img1.png").unwrap();
        assert_eq!(
            rewritten.read_entry(&img).unwrap(),
            container.read_entry(&img).unwrap()
        );
    }

    #[test]
    fn test_new_entry_appended() {
        let mut container = Container::from_bytes(sample_package()).unwrap();
        let mut replacements = Replacements::new();
        replacements.insert(well_known::styles(), b"<styles/>".to_vec());

        let out = container.to_bytes(&replacements).unwrap();
        let mut rewritten = Container::from_bytes(out).unwrap();

        let names = rewritten.entry_names().unwrap();
        assert_eq!(names.last().map(String::as_str), Some("styles.xml"));
        assert_eq!(names.len(), container.len() + 1);
    }

    #[test]
    fn test_commit_failure_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing-dir").join("out.odt");
        let mut container = Container::from_bytes(sample_package()).unwrap();

        let err = container.commit(&Replacements::new(), &output).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(!output.exists());
    }
}
