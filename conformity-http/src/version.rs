// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::Error;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
    Http2,
    Http3,
}

impl HttpVersion {
    /// Parse a protocol version, e.g. `1.1` or `2`. The `HTTP/` prefix used
    /// by the `SERVER_PROTOCOL` meta-variable is accepted as well.
    ///
    /// # References
    /// * [RFC 3875 Section 4.1.16](https://www.rfc-editor.org/rfc/rfc3875.html#section-4.1.16)
    pub fn parse(input: &str) -> Result<Self, Error> {
        let version = input.strip_prefix("HTTP/").unwrap_or(input);
        match version {
            "1.0" => Ok(Self::Http10),
            "1.1" => Ok(Self::Http11),
            "2" | "2.0" => Ok(Self::Http2),
            "3" | "3.0" => Ok(Self::Http3),
            _ => Err(Error::InvalidProtocolVersion(input.to_string())),
        }
    }

    /// Formats the [`HttpVersion`] as the bare protocol version, without the
    /// `HTTP/` prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http10 => "1.0",
            Self::Http11 => "1.1",
            Self::Http2 => "2",
            Self::Http3 => "3",
        }
    }
}
