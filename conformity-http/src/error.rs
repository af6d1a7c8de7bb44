// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use strum_macros::AsRefStr;

use std::{fmt, io};

use crate::UploadErrorCode;

/// An error raised while constructing or transitioning a message value.
///
/// Validation happens eagerly: a constructor or `with_*` transition either
/// returns a fully valid value, or one of these errors.
#[derive(Debug)]
pub enum Error {
    InvalidHeaderName {
        name: String,
        cause: HttpParseError,
    },
    InvalidHeaderValue {
        name: String,
        cause: HttpParseError,
    },
    InvalidMethod {
        method: String,
        cause: HttpParseError,
    },
    InvalidProtocolVersion(String),
    InvalidStatusCode(u16),
    InvalidRequestTarget(String),
    InvalidUriComponent {
        component: UriComponent,
        value: String,
    },
    InvalidCookieName(String),
    InvalidUpload(InvalidUploadArgument),

    /// The target path given to [`crate::UploadedFile::move_to`] was empty.
    InvalidTargetPath,

    /// The URI string couldn't be split into its components.
    MalformedUri(String),

    /// The port was outside of the `1..=65535` range.
    InvalidPort(u32),

    /// The uploaded file was already moved, and can't be read or moved again.
    UploadAlreadyMoved,

    /// The uploaded file carries a non-success upload error code.
    UploadError(UploadErrorCode),

    /// A filesystem or stream failure, passed through unchanged.
    Io(io::Error),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHeaderName { .. }
                | Self::InvalidHeaderValue { .. }
                | Self::InvalidMethod { .. }
                | Self::InvalidProtocolVersion(..)
                | Self::InvalidStatusCode(..)
                | Self::InvalidRequestTarget(..)
                | Self::InvalidUriComponent { .. }
                | Self::InvalidCookieName(..)
                | Self::InvalidUpload(..)
                | Self::InvalidTargetPath => ErrorKind::InvalidArgument,
            Self::MalformedUri(..) => ErrorKind::MalformedUri,
            Self::InvalidPort(..) => ErrorKind::InvalidPort,
            Self::UploadAlreadyMoved => ErrorKind::UploadAlreadyMoved,
            Self::UploadError(..) => ErrorKind::UploadError,
            Self::Io(..) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeaderName { name, cause } => write!(f, "invalid header name \"{name}\": {}", cause.as_ref()),
            Self::InvalidHeaderValue { name, cause } => write!(f, "invalid value for header \"{name}\": {}", cause.as_ref()),
            Self::InvalidMethod { method, cause } => write!(f, "invalid HTTP method \"{method}\": {}", cause.as_ref()),
            Self::InvalidProtocolVersion(version) => write!(f, "unsupported HTTP protocol version \"{version}\""),
            Self::InvalidStatusCode(code) => write!(f, "invalid status code {code}; must be in the range 100-599"),
            Self::InvalidRequestTarget(target) => write!(f, "invalid request target \"{target}\"; cannot contain whitespace"),
            Self::InvalidUriComponent { component, value } => write!(f, "invalid URI {}: \"{value}\"", component.as_ref()),
            Self::InvalidCookieName(name) if name.is_empty() => f.write_str("the cookie name cannot be empty"),
            Self::InvalidCookieName(name) => write!(f, "the cookie name \"{name}\" contains invalid characters"),
            Self::InvalidUpload(argument) => write!(f, "invalid uploaded file {}", argument.description()),
            Self::InvalidTargetPath => f.write_str("invalid path provided for move operation; must be a non-empty path"),
            Self::MalformedUri(uri) => write!(f, "the URI \"{uri}\" is malformed"),
            Self::InvalidPort(port) => write!(f, "invalid port {port}; must be in the range 1-65535"),
            Self::UploadAlreadyMoved => f.write_str("the uploaded file has already been moved"),
            Self::UploadError(code) => write!(f, "cannot use uploaded file due to upload error: {}", code.as_ref()),
            Self::Io(error) => write!(f, "I/O error: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

/// The category of an [`Error`], for callers that handle failures by kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum ErrorKind {
    InvalidArgument,
    MalformedUri,
    InvalidPort,
    UploadAlreadyMoved,
    UploadError,
    Io,
}

/// A syntax error in a token or field value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum HttpParseError {
    TokenContainsDelimiter,
    TokenContainsNonVisibleAscii,
    TokenContainsWhitespace,
    TokenEmpty,

    /// The field value contained a control character, such as CR or LF.
    ///
    /// ## Example:
    /// ```text
    /// X-Injected: value\r\nSet-Cookie: evil=1
    /// ```
    FieldValueContainsInvalidCharacters,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, AsRefStr)]
pub enum UriComponent {
    Scheme,
    UserInfo,
    Host,
    Path,
    Query,
    Fragment,
}

/// Which argument of an uploaded file was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvalidUploadArgument {
    /// The source is neither an open stream nor a non-empty path.
    Source,
    Size(String),
    ErrorStatus(String),
    ClientFilename,
    ClientMediaType,
}

impl InvalidUploadArgument {
    fn description(&self) -> String {
        match self {
            Self::Source => "stream or file provided".to_string(),
            Self::Size(value) => format!("size \"{value}\"; must be a non-negative integer"),
            Self::ErrorStatus(value) => format!("error status \"{value}\"; must be a known upload error code"),
            Self::ClientFilename => "client filename; must be a string".to_string(),
            Self::ClientMediaType => "client media type; must be a string".to_string(),
        }
    }
}
