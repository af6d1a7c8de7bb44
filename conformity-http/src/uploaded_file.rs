// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use strum_macros::AsRefStr;

use crate::{
    Error,
    InvalidUploadArgument,
    Stream,
};

/// The outcome of an upload, as reported by the hosting environment. The
/// numeric values are the ones used by the environment (`UPLOAD_ERR_*`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, AsRefStr)]
#[repr(u8)]
pub enum UploadErrorCode {
    /// There is no error, the file uploaded with success.
    #[default]
    Ok = 0,

    /// The uploaded file exceeds the size limit of the environment.
    IniSize = 1,

    /// The uploaded file exceeds the size limit specified in the HTML form.
    FormSize = 2,

    /// The uploaded file was only partially uploaded.
    Partial = 3,

    /// No file was uploaded.
    NoFile = 4,

    /// Missing a temporary folder.
    NoTmpDir = 6,

    /// Failed to write file to disk.
    CantWrite = 7,

    /// An extension of the environment stopped the upload.
    Extension = 8,
}

impl UploadErrorCode {
    #[must_use]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        *self == Self::Ok
    }
}

impl TryFrom<i64> for UploadErrorCode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Ok,
            1 => Self::IniSize,
            2 => Self::FormSize,
            3 => Self::Partial,
            4 => Self::NoFile,
            6 => Self::NoTmpDir,
            7 => Self::CantWrite,
            8 => Self::Extension,
            _ => return Err(Error::InvalidUpload(InvalidUploadArgument::ErrorStatus(value.to_string()))),
        })
    }
}

/// Where the contents of an uploaded file live.
#[derive(Clone, Debug)]
pub enum UploadSource {
    /// An already opened stream.
    Stream(Stream),

    /// A file on disk, opened lazily.
    Path(PathBuf),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UploadState {
    Ready,
    Moved,
}

/// A file sent by the client, independent of whether its contents are held
/// by a stream or by a file on disk.
///
/// An uploaded file can be moved exactly once. After that, both
/// [`UploadedFile::stream`] and [`UploadedFile::move_to`] fail with
/// [`Error::UploadAlreadyMoved`]. A file carrying an upload error can't be
/// read or moved at all, but [`UploadedFile::error`] is always available.
#[derive(Debug)]
pub struct UploadedFile {
    source: UploadSource,
    size: Option<u64>,
    error: UploadErrorCode,
    client_filename: Option<String>,
    client_media_type: Option<String>,
    state: Mutex<UploadState>,
}

impl UploadedFile {
    /// Create an uploaded file. An empty path is only accepted when the file
    /// carries an upload error, since there are no contents to reach then.
    pub fn new(
        source: UploadSource,
        size: Option<u64>,
        error: UploadErrorCode,
        client_filename: Option<String>,
        client_media_type: Option<String>,
    ) -> Result<Self, Error> {
        if let UploadSource::Path(path) = &source {
            if error.is_ok() && path.as_os_str().is_empty() {
                return Err(Error::InvalidUpload(InvalidUploadArgument::Source));
            }
        }

        Ok(Self {
            source,
            size,
            error,
            client_filename,
            client_media_type,
            state: Mutex::new(UploadState::Ready),
        })
    }

    pub fn from_stream(stream: Stream, size: Option<u64>, error: UploadErrorCode) -> Result<Self, Error> {
        Self::new(UploadSource::Stream(stream), size, error, None, None)
    }

    pub fn from_path(path: impl Into<PathBuf>, size: Option<u64>, error: UploadErrorCode) -> Result<Self, Error> {
        Self::new(UploadSource::Path(path.into()), size, error, None, None)
    }

    pub fn source(&self) -> &UploadSource {
        &self.source
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn error(&self) -> UploadErrorCode {
        self.error
    }

    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    pub fn is_moved(&self) -> bool {
        matches!(self.lock_state().as_deref(), Ok(UploadState::Moved))
    }

    /// Returns a stream of the contents. A path source is opened on every
    /// call.
    pub fn stream(&self) -> Result<Stream, Error> {
        if !self.error.is_ok() {
            return Err(Error::UploadError(self.error));
        }

        if *self.lock_state()? == UploadState::Moved {
            return Err(Error::UploadAlreadyMoved);
        }

        match &self.source {
            UploadSource::Stream(stream) => Ok(stream.clone()),
            UploadSource::Path(path) => Ok(Stream::open(path)?),
        }
    }

    /// Relocate the contents to `target`. A stream is copied into a newly
    /// created file, a path is renamed. Filesystem failures are returned as
    /// they are, and leave the file ready to be moved again.
    pub fn move_to(&self, target: impl AsRef<Path>) -> Result<(), Error> {
        let target = target.as_ref();
        if target.as_os_str().is_empty() {
            return Err(Error::InvalidTargetPath);
        }

        let mut state = self.lock_state()?;
        if *state == UploadState::Moved {
            return Err(Error::UploadAlreadyMoved);
        }

        if !self.error.is_ok() {
            return Err(Error::UploadError(self.error));
        }

        match &self.source {
            UploadSource::Stream(stream) => {
                let mut file = File::create(target)?;
                stream.copy_to(&mut file)?;
            }
            UploadSource::Path(path) => fs::rename(path, target)?,
        }

        *state = UploadState::Moved;
        log::debug!("Moved uploaded file {:?} to {}", self.client_filename, target.display());
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, UploadState>, Error> {
        self.state.lock()
            .map_err(|_| Error::Io(io::Error::new(io::ErrorKind::Other, "uploaded file state poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stream_with_contents() -> Stream {
        let stream = Stream::memory();
        stream.write(b"Foo bar!").unwrap();
        stream
    }

    #[rstest]
    #[case(0, UploadErrorCode::Ok)]
    #[case(1, UploadErrorCode::IniSize)]
    #[case(4, UploadErrorCode::NoFile)]
    #[case(8, UploadErrorCode::Extension)]
    fn test_error_code_from_integer(#[case] value: i64, #[case] expected: UploadErrorCode) {
        assert_eq!(UploadErrorCode::try_from(value).unwrap(), expected);
        assert_eq!(i64::from(expected.code()), value);
    }

    #[rstest]
    #[case(-1)]
    #[case(5)]
    #[case(9)]
    fn test_invalid_error_code(#[case] value: i64) {
        assert!(matches!(
            UploadErrorCode::try_from(value),
            Err(Error::InvalidUpload(InvalidUploadArgument::ErrorStatus(..)))
        ));
    }

    #[test]
    fn test_empty_path_is_rejected_without_upload_error() {
        assert!(matches!(
            UploadedFile::from_path("", Some(0), UploadErrorCode::Ok),
            Err(Error::InvalidUpload(InvalidUploadArgument::Source))
        ));
        assert!(UploadedFile::from_path("", None, UploadErrorCode::NoFile).is_ok());
    }

    #[test]
    fn test_stream_returns_original_stream() {
        let stream = Stream::memory();
        let upload = UploadedFile::from_stream(stream.clone(), Some(0), UploadErrorCode::Ok).unwrap();
        assert!(upload.stream().unwrap().ptr_eq(&stream));
    }

    #[test]
    fn test_stream_opens_path_lazily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        io::Write::write_all(&mut file, b"from disk").unwrap();

        let upload = UploadedFile::from_path(file.path(), Some(9), UploadErrorCode::Ok).unwrap();
        assert_eq!(upload.stream().unwrap().contents().unwrap(), b"from disk");
    }

    #[test]
    fn test_moves_stream_to_designated_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("moved");
        let stream = stream_with_contents();
        let upload = UploadedFile::from_stream(stream.clone(), Some(8), UploadErrorCode::Ok).unwrap();

        upload.move_to(&target).unwrap();
        assert!(upload.is_moved());
        assert_eq!(fs::read(&target).unwrap(), stream.contents().unwrap());
    }

    #[test]
    fn test_move_renames_path_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.tmp");
        let target = dir.path().join("final.txt");
        fs::write(&source, b"contents").unwrap();

        let upload = UploadedFile::new(
            UploadSource::Path(source.clone()),
            Some(8),
            UploadErrorCode::Ok,
            Some("final.txt".into()),
            Some("text/plain".into()),
        ).unwrap();
        upload.move_to(&target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"contents");
        assert_eq!(upload.client_filename(), Some("final.txt"));
        assert_eq!(upload.client_media_type(), Some("text/plain"));
    }

    #[test]
    fn test_move_cannot_be_called_more_than_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("moved");
        let upload = UploadedFile::from_stream(stream_with_contents(), None, UploadErrorCode::Ok).unwrap();

        upload.move_to(&target).unwrap();
        assert!(matches!(upload.move_to(&target), Err(Error::UploadAlreadyMoved)));
        assert!(matches!(upload.stream(), Err(Error::UploadAlreadyMoved)));
    }

    #[test]
    fn test_move_after_stream_access_is_permitted() {
        let dir = tempfile::tempdir().unwrap();
        let upload = UploadedFile::from_stream(stream_with_contents(), None, UploadErrorCode::Ok).unwrap();

        _ = upload.stream().unwrap();
        upload.move_to(dir.path().join("moved")).unwrap();
    }

    #[test]
    fn test_move_rejects_empty_path() {
        let upload = UploadedFile::from_stream(stream_with_contents(), None, UploadErrorCode::Ok).unwrap();
        assert!(matches!(upload.move_to(""), Err(Error::InvalidTargetPath)));
        assert!(!upload.is_moved());
    }

    #[test]
    fn test_failed_move_surfaces_io_error_and_stays_ready() {
        let dir = tempfile::tempdir().unwrap();
        let upload = UploadedFile::from_stream(stream_with_contents(), None, UploadErrorCode::Ok).unwrap();

        let result = upload.move_to(dir.path().join("missing").join("moved"));
        assert!(matches!(result, Err(Error::Io(ref error)) if error.kind() == io::ErrorKind::NotFound));
        assert!(!upload.is_moved());
        upload.move_to(dir.path().join("moved")).unwrap();
    }

    #[rstest]
    #[case(UploadErrorCode::IniSize)]
    #[case(UploadErrorCode::FormSize)]
    #[case(UploadErrorCode::Partial)]
    #[case(UploadErrorCode::NoFile)]
    #[case(UploadErrorCode::NoTmpDir)]
    #[case(UploadErrorCode::CantWrite)]
    #[case(UploadErrorCode::Extension)]
    fn test_upload_error_prevents_use(#[case] code: UploadErrorCode) {
        let dir = tempfile::tempdir().unwrap();
        let upload = UploadedFile::from_path("not ok", Some(0), code).unwrap();

        assert_eq!(upload.error(), code);
        assert!(matches!(upload.stream(), Err(Error::UploadError(c)) if c == code));
        assert!(matches!(upload.move_to(dir.path().join("target")), Err(Error::UploadError(c)) if c == code));
        assert!(!upload.is_moved());
    }

    #[test]
    fn test_uploaded_file_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UploadedFile>();
    }
}
