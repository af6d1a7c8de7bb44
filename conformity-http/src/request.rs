// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{
    syntax,
    Error,
    HeaderBag,
    HttpMessage,
    HttpVersion,
    Message,
    Method,
    Stream,
    Uri,
};

/// A client request: a [`Message`] with a method and a target URI.
#[derive(Clone, Debug, Default)]
pub struct Request {
    message: Message,
    method: Method,
    uri: Uri,
    request_target: Option<String>,
}

impl Request {
    /// Create a request. When the headers don't carry a `Host` header, it is
    /// derived from the host and port of the URI.
    pub fn new(method: Method, uri: Uri, headers: HeaderBag) -> Result<Self, Error> {
        let headers = match host_from_uri(&uri) {
            Some(host) if !headers.contains("Host") => headers.with("Host", &host)?,
            _ => headers,
        };

        Ok(Self {
            message: Message::new(HttpVersion::default(), headers, Stream::memory()),
            method,
            uri,
            request_target: None,
        })
    }
}

/// The accessor and transition contract of requests, on top of
/// [`HttpMessage`].
pub trait HttpRequest: HttpMessage {
    fn request(&self) -> &Request;

    /// Returns a copy of `self` that carries the given request.
    #[must_use]
    fn with_request(&self, request: Request) -> Self;

    fn method(&self) -> &Method {
        &self.request().method
    }

    fn uri(&self) -> &Uri {
        &self.request().uri
    }

    /// The request target as it appears on the request line: either the
    /// explicitly set target, or the path and query of the URI.
    ///
    /// ```text
    /// origin-form    = absolute-path [ "?" query ]
    /// ```
    fn request_target(&self) -> String {
        let request = self.request();
        if let Some(target) = &request.request_target {
            return target.clone();
        }

        let mut target = match request.uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if !request.uri.query().is_empty() {
            target.push('?');
            target.push_str(request.uri.query());
        }
        target
    }

    fn with_request_target(&self, target: &str) -> Result<Self, Error> {
        if target.is_empty() || target.chars().any(|character| syntax::is_whitespace_character(character) || character.is_control()) {
            return Err(Error::InvalidRequestTarget(target.to_string()));
        }

        let mut request = self.request().clone();
        request.request_target = Some(target.to_string());
        Ok(self.with_request(request))
    }

    fn with_method(&self, method: &str) -> Result<Self, Error> {
        let mut request = self.request().clone();
        request.method = Method::parse(method)?;
        Ok(self.with_request(request))
    }

    /// Replace the URI. The `Host` header is updated from the new URI, unless
    /// `preserve_host` is set and the request already has a `Host` header, or
    /// the URI has no host.
    fn with_uri(&self, uri: Uri, preserve_host: bool) -> Result<Self, Error> {
        let mut request = self.request().clone();
        let keep_host = preserve_host && request.message.has_header("Host");
        if let Some(host) = host_from_uri(&uri).filter(|_| !keep_host) {
            request.message = request.message.with_header("Host", &host)?;
        }
        request.uri = uri;
        Ok(self.with_request(request))
    }
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn with_message(&self, message: Message) -> Self {
        Self { message, ..self.clone() }
    }
}

impl HttpRequest for Request {
    fn request(&self) -> &Request {
        self
    }

    fn with_request(&self, request: Request) -> Self {
        request
    }
}

fn host_from_uri(uri: &Uri) -> Option<String> {
    if uri.host().is_empty() {
        return None;
    }

    Some(match uri.port() {
        Some(port) => format!("{}:{port}", uri.host()),
        None => uri.host().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(uri: &str) -> Request {
        Request::new(Method::Get, Uri::parse(uri).unwrap(), HeaderBag::new()).unwrap()
    }

    #[test]
    fn test_host_header_is_derived_from_uri() {
        assert_eq!(request("http://example.com/").header_line("Host"), "example.com");
        assert_eq!(request("http://example.com:8080/").header_line("host"), "example.com:8080");
        assert!(!request("/relative").has_header("Host"));
    }

    #[test]
    fn test_explicit_host_header_wins() {
        let headers = HeaderBag::try_from_pairs([("host", "proxy.local")]).unwrap();
        let request = Request::new(Method::Get, Uri::parse("http://example.com/").unwrap(), headers).unwrap();
        assert_eq!(request.header_line("Host"), "proxy.local");
    }

    #[rstest]
    #[case("http://example.com", "/")]
    #[case("http://example.com/foo/bar", "/foo/bar")]
    #[case("http://example.com/foo?bar=baz", "/foo?bar=baz")]
    fn test_request_target_from_uri(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(request(uri).request_target(), expected);
    }

    #[test]
    fn test_with_request_target() {
        let original = request("http://example.com/foo");
        let changed = original.with_request_target("*").unwrap();
        assert_eq!(changed.request_target(), "*");
        assert_eq!(original.request_target(), "/foo");
        assert!(matches!(original.with_request_target("/foo bar"), Err(Error::InvalidRequestTarget(..))));
    }

    #[test]
    fn test_with_method_validates() {
        let original = request("/");
        assert_eq!(original.with_method("post").unwrap().method(), &Method::Post);
        assert!(matches!(original.with_method("BAD METHOD"), Err(Error::InvalidMethod { .. })));
        assert_eq!(original.method(), &Method::Get);
    }

    #[test]
    fn test_with_uri_updates_host() {
        let original = request("http://example.com/");
        let uri = Uri::parse("http://example.org:8000/foo").unwrap();

        let changed = original.with_uri(uri.clone(), false).unwrap();
        assert_eq!(changed.header_line("Host"), "example.org:8000");
        assert_eq!(changed.uri().path(), "/foo");

        let preserved = original.with_uri(uri.clone(), true).unwrap();
        assert_eq!(preserved.header_line("Host"), "example.com");

        let without_host = request("/").with_uri(uri, true).unwrap();
        assert_eq!(without_host.header_line("Host"), "example.org:8000");
        assert_eq!(original.uri().host(), "example.com");
    }
}
