//! Mock I/O helpers for testing without hand-made files.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A temporary directory that is automatically deleted when dropped.
///
/// Handy as a resource root.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `filename` inside the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, filename: &str, contents: impl AsRef<[u8]>) -> std::io::Result<PathBuf> {
        let path = self.path.join(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Create a temporary file with the given extension holding `contents`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
///
/// # Example
///
/// ```
/// use rowcast::testing::write_fixture;
///
/// let fixture = write_fixture("csv", "id,amount\n1,2.5\n").unwrap();
/// assert!(fixture.path().exists());
/// ```
pub fn write_fixture(extension: &str, contents: impl AsRef<[u8]>) -> std::io::Result<TempFilePath> {
    let temp = TempFilePath::with_extension(extension)?;
    let mut file = std::fs::File::create(temp.path())?;
    file.write_all(contents.as_ref())?;
    file.flush()?;
    Ok(temp)
}

/// Create a gzip-compressed temporary file holding `contents`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
#[cfg(feature = "compression-gzip")]
pub fn write_gzip_fixture(
    extension: &str,
    contents: impl AsRef<[u8]>,
) -> std::io::Result<TempFilePath> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let temp = TempFilePath::with_extension(extension)?;
    let file = std::fs::File::create(temp.path())?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_ref())?;
    encoder.finish()?.flush()?;
    Ok(temp)
}
