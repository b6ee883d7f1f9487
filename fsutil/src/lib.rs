use std::{
    fs::{self, ReadDir},
    io,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{ffi::OsString, io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Non UTF-8 filename {0:?} in '{1}'")]
        NonUtf8Filename(OsString, PathBuf),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        if !dir.as_os_str().is_empty() {
            self::mkdir_all(dir)?;
        }
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Removes a file; a missing file is not an error.
/// Returns whether a file was actually removed.
#[must_use]
pub fn remove_file_if_exists(filepath: impl AsRef<Path>) -> Result<bool> {
    match fs::remove_file(&filepath) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::SingleIO(
            "Cannot remove file",
            filepath.as_ref().to_owned(),
            e,
        )),
    }
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Names of the regular (non-directory) entries of `dir`, in the order the OS returns them.
/// Entries whose name is not valid UTF-8 are skipped with a warning.
pub fn list_filenames(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut names = Vec::new();
    for entry in self::read_dir(dir)? {
        let entry = entry.map_err(|e| Error::SingleIO("Cannot access dir entry", dir.into(), e))?;
        let Ok(ft) = entry.file_type() else {
            continue;
        };
        if ft.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("{}", Error::NonUtf8Filename(raw, dir.to_owned())),
        }
    }
    Ok(names)
}

/// A single file that is rewritten over and over and removed when no longer needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFile {
    pub filepath: PathBuf,
}

impl ScratchFile {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.filepath
    }

    #[must_use]
    pub fn write(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        self::write_with_mkdir(&self.filepath, contents)
    }

    #[must_use]
    pub fn read(&self) -> Result<String> {
        self::read_to_string(&self.filepath)
    }

    #[must_use]
    pub fn remove(&self) -> Result<bool> {
        self::remove_file_if_exists(&self.filepath)
    }
}
