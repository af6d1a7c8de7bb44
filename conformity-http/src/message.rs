// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{
    Error,
    HeaderBag,
    HttpVersion,
    Stream,
};

/// The protocol version, header fields and body shared by requests and
/// responses.
///
/// The message owns its headers, but only references its body: the
/// [`Stream`] may be held elsewhere as well.
#[derive(Clone, Debug, Default)]
pub struct Message {
    version: HttpVersion,
    headers: HeaderBag,
    body: Stream,
}

impl Message {
    pub fn new(version: HttpVersion, headers: HeaderBag, body: Stream) -> Self {
        Self { version, headers, body }
    }
}

/// The immutable accessor and transition contract of an HTTP message.
///
/// Every `with_*` transition returns a new value that differs from `self` in
/// exactly the targeted attribute; `self` stays valid and unchanged.
pub trait HttpMessage: Sized {
    fn message(&self) -> &Message;

    /// Returns a copy of `self` that carries the given message.
    #[must_use]
    fn with_message(&self, message: Message) -> Self;

    fn protocol_version(&self) -> HttpVersion {
        self.message().version
    }

    fn headers(&self) -> &HeaderBag {
        &self.message().headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    /// The values of the header, or an empty slice if it isn't present.
    fn header(&self, name: &str) -> &[String] {
        self.headers().get(name)
    }

    /// The values of the header joined by `", "`.
    fn header_line(&self, name: &str) -> String {
        self.headers().line(name)
    }

    fn body(&self) -> &Stream {
        &self.message().body
    }

    /// Parse and set the protocol version, e.g. `"1.0"` or `"2"`.
    fn with_protocol_version(&self, version: &str) -> Result<Self, Error> {
        let version = HttpVersion::parse(version)?;
        Ok(self.with_version(version))
    }

    #[must_use]
    fn with_version(&self, version: HttpVersion) -> Self {
        let mut message = self.message().clone();
        message.version = version;
        self.with_message(message)
    }

    fn with_header(&self, name: &str, value: &str) -> Result<Self, Error> {
        Ok(self.with_headers(self.headers().with(name, value)?))
    }

    fn with_header_values(&self, name: &str, values: &[&str]) -> Result<Self, Error> {
        Ok(self.with_headers(self.headers().with_values(name, values.iter().copied())?))
    }

    fn with_added_header(&self, name: &str, value: &str) -> Result<Self, Error> {
        Ok(self.with_headers(self.headers().with_added(name, value)?))
    }

    #[must_use]
    fn without_header(&self, name: &str) -> Self {
        self.with_headers(self.headers().without(name))
    }

    #[must_use]
    fn with_headers(&self, headers: HeaderBag) -> Self {
        let mut message = self.message().clone();
        message.headers = headers;
        self.with_message(message)
    }

    #[must_use]
    fn with_body(&self, body: Stream) -> Self {
        let mut message = self.message().clone();
        message.body = body;
        self.with_message(message)
    }
}

impl HttpMessage for Message {
    fn message(&self) -> &Message {
        self
    }

    fn with_message(&self, message: Message) -> Self {
        message
    }
}
