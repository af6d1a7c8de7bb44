// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    path::PathBuf,
    sync::Arc,
};

use conformity_http::{
    Error,
    InvalidUploadArgument,
    Node,
    Stream,
    Tree,
    UploadErrorCode,
    UploadSource,
    UploadedFile,
    UploadedFiles,
};

/// A scalar in the raw file-upload description delivered by the host.
#[derive(Clone, Debug)]
pub enum RawFileValue {
    Null,
    Text(String),
    Integer(i64),

    /// The contents were already opened by the host.
    Stream(Stream),

    /// A file that was already normalized; it is kept as is.
    Uploaded(Arc<UploadedFile>),
}

impl From<&str> for RawFileValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawFileValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawFileValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Stream> for RawFileValue {
    fn from(value: Stream) -> Self {
        Self::Stream(value)
    }
}

/// The raw file-upload description, e.g.:
///
/// ```text
/// avatar:    { tmp_name, size, error, name, type }
/// documents: { tmp_name: { 0, 1 }, size: { 0, 1 }, error: { 0, 1 }, ... }
/// ```
pub type RawFiles = Tree<RawFileValue>;

const TMP_NAME: &str = "tmp_name";
const SIZE: &str = "size";
const ERROR: &str = "error";
const NAME: &str = "name";
const TYPE: &str = "type";

/// Turn the raw description into a tree of [`UploadedFile`]s.
///
/// A mapping with a scalar `tmp_name` describes one file. A mapping whose
/// `tmp_name` is itself a mapping describes parallel trees of metadata, which
/// are paired index by index, keeping the nesting. Any other mapping is
/// normalized recursively, and scalars that aren't uploaded files are
/// dropped.
pub fn normalize_files(files: &RawFiles) -> Result<UploadedFiles, Error> {
    let mut normalized = UploadedFiles::new();

    for (key, node) in files.iter() {
        match node {
            Node::Leaf(RawFileValue::Uploaded(file)) => normalized.insert_leaf(key, Arc::clone(file)),
            Node::Leaf(..) => {
                log::debug!("Dropping file entry {key:?}: not a file description");
            }
            Node::Branch(tree) if tree.get(TMP_NAME).is_some() => {
                normalized.insert(key, create_from_description(tree)?);
            }
            Node::Branch(tree) => {
                let nested = normalize_files(tree)?;
                if nested.is_empty() {
                    log::debug!("Dropping file entry {key:?}: no files inside");
                } else {
                    normalized.insert(key, Node::Branch(nested));
                }
            }
        }
    }

    Ok(normalized)
}

fn create_from_description(description: &RawFiles) -> Result<Node<Arc<UploadedFile>>, Error> {
    match description.get(TMP_NAME) {
        Some(Node::Branch(tmp_names)) => normalize_nested_description(description, tmp_names).map(Node::Branch),
        _ => create_uploaded_file(description).map(|file| Node::Leaf(Arc::new(file))),
    }
}

/// Pair every index of the `tmp_name` tree with the same index of the other
/// metadata trees.
fn normalize_nested_description(description: &RawFiles, tmp_names: &RawFiles) -> Result<UploadedFiles, Error> {
    let mut normalized = UploadedFiles::new();

    for (index, tmp_name) in tmp_names.iter() {
        let mut nested = RawFiles::new();
        nested.insert(TMP_NAME, tmp_name.clone());
        for field in [SIZE, ERROR, NAME, TYPE] {
            if let Some(node) = description.get_path(&[field, index]) {
                nested.insert(field, node.clone());
            }
        }

        normalized.insert(index, create_from_description(&nested)?);
    }

    Ok(normalized)
}

fn create_uploaded_file(description: &RawFiles) -> Result<UploadedFile, Error> {
    let source = match description.get(TMP_NAME) {
        Some(Node::Leaf(RawFileValue::Text(path))) => UploadSource::Path(PathBuf::from(path)),
        Some(Node::Leaf(RawFileValue::Stream(stream))) => UploadSource::Stream(stream.clone()),
        Some(Node::Leaf(RawFileValue::Null)) | None => UploadSource::Path(PathBuf::new()),
        _ => return Err(Error::InvalidUpload(InvalidUploadArgument::Source)),
    };

    let size = match description.get(SIZE) {
        None | Some(Node::Leaf(RawFileValue::Null)) => None,
        Some(Node::Leaf(RawFileValue::Integer(size))) => Some(u64::try_from(*size)
            .map_err(|_| Error::InvalidUpload(InvalidUploadArgument::Size(size.to_string())))?),
        Some(Node::Leaf(RawFileValue::Text(size))) => Some(size.parse()
            .map_err(|_| Error::InvalidUpload(InvalidUploadArgument::Size(size.clone())))?),
        Some(..) => return Err(Error::InvalidUpload(InvalidUploadArgument::Size(String::new()))),
    };

    let error = match description.get(ERROR) {
        None | Some(Node::Leaf(RawFileValue::Null)) => UploadErrorCode::Ok,
        Some(Node::Leaf(RawFileValue::Integer(code))) => UploadErrorCode::try_from(*code)?,
        Some(Node::Leaf(RawFileValue::Text(code))) => code.parse::<i64>()
            .map_err(|_| Error::InvalidUpload(InvalidUploadArgument::ErrorStatus(code.clone())))
            .and_then(UploadErrorCode::try_from)?,
        Some(..) => return Err(Error::InvalidUpload(InvalidUploadArgument::ErrorStatus(String::new()))),
    };

    let client_filename = optional_text(description, NAME, InvalidUploadArgument::ClientFilename)?;
    let client_media_type = optional_text(description, TYPE, InvalidUploadArgument::ClientMediaType)?;

    UploadedFile::new(source, size, error, client_filename, client_media_type)
}

fn optional_text(description: &RawFiles, field: &str, invalid: InvalidUploadArgument) -> Result<Option<String>, Error> {
    match description.get(field) {
        None | Some(Node::Leaf(RawFileValue::Null)) => Ok(None),
        Some(Node::Leaf(RawFileValue::Text(text))) => Ok(Some(text.clone())),
        Some(..) => Err(Error::InvalidUpload(invalid)),
    }
}
