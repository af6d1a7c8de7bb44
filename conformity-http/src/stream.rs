// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    fmt,
    fs::File,
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

/// A seekable byte stream used as a message body.
///
/// `Stream` is a shared handle: cloning it yields another reference to the
/// same underlying resource, so a message can reference a body that the
/// caller holds onto as well.
#[derive(Clone, Default)]
pub struct Stream {
    inner: Arc<Mutex<Backing>>,
}

enum Backing {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

impl Default for Backing {
    fn default() -> Self {
        Backing::Memory(Cursor::new(Vec::new()))
    }
}

impl Stream {
    /// Create an empty, in-memory stream.
    pub fn memory() -> Stream {
        Stream::default()
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Stream {
        Stream::with_backing(Backing::Memory(Cursor::new(bytes.into())))
    }

    pub fn from_file(file: File) -> Stream {
        Stream::with_backing(Backing::File(file))
    }

    /// Open the file at the given path for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Stream> {
        File::open(path).map(Stream::from_file)
    }

    fn with_backing(backing: Backing) -> Stream {
        Stream { inner: Arc::new(Mutex::new(backing)) }
    }

    /// Write the bytes at the current position.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.lock()?.write_all(bytes)
    }

    /// Read the whole stream from the start. The position is left at the end.
    pub fn contents(&self) -> io::Result<Vec<u8>> {
        let mut backing = self.lock()?;
        backing.seek(SeekFrom::Start(0))?;
        let mut contents = Vec::new();
        backing.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Copy the whole stream, from the start, into the writer.
    pub fn copy_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<u64> {
        let mut backing = self.lock()?;
        backing.seek(SeekFrom::Start(0))?;
        io::copy(&mut *backing, writer)
    }

    /// Do both handles reference the same underlying resource?
    #[must_use]
    pub fn ptr_eq(&self, other: &Stream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Backing>> {
        self.inner.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stream lock poisoned"))
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.inner.try_lock().as_deref() {
            Ok(Backing::Memory(..)) => "memory",
            Ok(Backing::File(..)) => "file",
            Err(..) => "locked",
        };
        f.debug_struct("Stream").field("kind", &kind).finish()
    }
}

impl From<&str> for Stream {
    fn from(value: &str) -> Self {
        Stream::from_bytes(value.as_bytes())
    }
}

impl From<String> for Stream {
    fn from(value: String) -> Self {
        Stream::from_bytes(value.into_bytes())
    }
}

impl Read for Backing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Backing::Memory(cursor) => cursor.read(buf),
            Backing::File(file) => file.read(buf),
        }
    }
}

impl Write for Backing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Backing::Memory(cursor) => cursor.write(buf),
            Backing::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Backing::Memory(cursor) => cursor.flush(),
            Backing::File(file) => file.flush(),
        }
    }
}

impl Seek for Backing {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Backing::Memory(cursor) => cursor.seek(pos),
            Backing::File(file) => file.seek(pos),
        }
    }
}
