// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! An immutable URI value object.
//!
//! # References
//! * [RFC 3986](https://www.rfc-editor.org/rfc/rfc3986.html)

use std::{
    fmt::{self, Write},
    str::FromStr,
};

use crate::{
    abnf,
    syntax,
    Error,
    UriComponent,
};

/// ```text
/// URI         = scheme ":" hier-part [ "?" query ] [ "#" fragment ]
/// hier-part   = "//" authority path-abempty
///             / path-absolute
///             / path-rootless
///             / path-empty
/// authority   = [ userinfo "@" ] host [ ":" port ]
/// ```
///
/// The scheme and host are kept in lower case. The path, query and fragment
/// are percent-encoded when set, leaving existing `%XX` triplets alone, so
/// encoding twice yields the same result.
#[derive(Clone, Debug, Default)]
pub struct Uri {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    /// Create an empty URI, rendered as the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        let malformed = || Error::MalformedUri(input.to_string());

        if input.bytes().any(|byte| byte == b' ' || abnf::is_control_character(byte)) {
            return Err(malformed());
        }

        let (rest, fragment) = input.split_once('#').unwrap_or((input, ""));
        let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

        let (scheme, rest) = match rest.split_once(':') {
            Some((scheme, rest)) if syntax::is_valid_scheme(scheme) => (scheme, rest),
            _ => ("", rest),
        };

        let mut uri = Uri::new()
            .with_scheme(scheme)?;

        let path = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                let authority = parse_authority(&after[..end]).ok_or_else(malformed)?;

                let requires_host = authority.port.is_some()
                    || !authority.user_info.is_empty()
                    || matches!(uri.scheme.as_str(), "http" | "https");
                if authority.host.is_empty() && requires_host {
                    return Err(malformed());
                }

                let (user, password) = match authority.user_info.split_once(':') {
                    Some((user, password)) => (user, Some(password)),
                    None => (authority.user_info, None),
                };

                uri = uri.with_user_info(user, password)
                    .with_host(authority.host)?
                    .with_port(authority.port)?;
                &after[end..]
            }
            None => rest,
        };

        Ok(uri.with_path(path)?
            .with_query_component(query)?
            .with_fragment(fragment))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port, or `None` when it isn't set or when it is the default port
    /// of the scheme.
    pub fn port(&self) -> Option<u16> {
        self.port.filter(|port| Some(*port) != default_port(&self.scheme))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// ```text
    /// authority   = [ userinfo "@" ] host [ ":" port ]
    /// ```
    ///
    /// Empty when there is no host.
    pub fn authority(&self) -> String {
        if self.host.is_empty() {
            return String::new();
        }

        let mut authority = String::new();
        if !self.user_info.is_empty() {
            authority.push_str(&self.user_info);
            authority.push('@');
        }
        authority.push_str(&self.host);
        if let Some(port) = self.port() {
            _ = write!(authority, ":{port}");
        }
        authority
    }

    pub fn with_scheme(&self, scheme: &str) -> Result<Self, Error> {
        let scheme = scheme.strip_suffix("://").unwrap_or(scheme);
        if !scheme.is_empty() && !syntax::is_valid_scheme(scheme) {
            return Err(Error::InvalidUriComponent { component: UriComponent::Scheme, value: scheme.to_string() });
        }

        Ok(Self { scheme: scheme.to_ascii_lowercase(), ..self.clone() })
    }

    /// Set the user information; the password is only used when the user
    /// isn't empty.
    #[must_use]
    pub fn with_user_info(&self, user: &str, password: Option<&str>) -> Self {
        let mut user_info = percent_encode(user, b"");
        if let Some(password) = password.filter(|_| !user.is_empty()) {
            user_info.push(':');
            user_info.push_str(&percent_encode(password, b":"));
        }

        Self { user_info, ..self.clone() }
    }

    pub fn with_host(&self, host: &str) -> Result<Self, Error> {
        let invalid = host.bytes().any(|byte| {
            matches!(byte, b'/' | b'?' | b'#' | b'@' | b' ') || abnf::is_control_character(byte)
        });
        if invalid {
            return Err(Error::InvalidUriComponent { component: UriComponent::Host, value: host.to_string() });
        }

        Ok(Self { host: host.to_ascii_lowercase(), ..self.clone() })
    }

    /// Set the port, or clear it with `None`. Only `1..=65535` is accepted.
    pub fn with_port(&self, port: Option<u32>) -> Result<Self, Error> {
        let port = match port {
            Some(port) => match u16::try_from(port) {
                Ok(value) if value != 0 => Some(value),
                _ => return Err(Error::InvalidPort(port)),
            },
            None => None,
        };

        Ok(Self { port, ..self.clone() })
    }

    pub fn with_path(&self, path: &str) -> Result<Self, Error> {
        if path.contains(['?', '#']) {
            return Err(Error::InvalidUriComponent { component: UriComponent::Path, value: path.to_string() });
        }

        let path = percent_encode(path, b":@/");
        let path = if self.authority().is_empty() && path.starts_with("//") {
            format!("/{}", path.trim_start_matches('/'))
        } else {
            path
        };

        Ok(Self { path, ..self.clone() })
    }

    /// Set the query, without the leading `?`.
    pub fn with_query(&self, query: &str) -> Result<Self, Error> {
        self.with_query_component(query.strip_prefix('?').unwrap_or(query))
    }

    /// Set the query exactly as it appears after the `?` delimiter.
    fn with_query_component(&self, query: &str) -> Result<Self, Error> {
        if query.contains('#') {
            return Err(Error::InvalidUriComponent { component: UriComponent::Query, value: query.to_string() });
        }

        Ok(Self { query: percent_encode(query, b":@/?"), ..self.clone() })
    }

    /// Set the fragment, without the leading `#`.
    #[must_use]
    pub fn with_fragment(&self, fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        Self { fragment: percent_encode(fragment, b":@/?"), ..self.clone() }
    }
}

/// The port implied by the scheme when none is given.
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

struct Authority<'a> {
    user_info: &'a str,
    host: &'a str,
    port: Option<u32>,
}

fn parse_authority(authority: &str) -> Option<Authority<'_>> {
    let (user_info, host_and_port) = match authority.rsplit_once('@') {
        Some((user_info, rest)) => (user_info, rest),
        None => ("", authority),
    };

    let (host, port) = if host_and_port.starts_with('[') {
        let close = host_and_port.find(']')?;
        let (host, rest) = host_and_port.split_at(close + 1);
        if rest.is_empty() {
            (host, None)
        } else {
            (host, Some(rest.strip_prefix(':')?))
        }
    } else {
        match host_and_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_and_port, None),
        }
    };

    let port = match port {
        None | Some("") => None,
        Some(port) if port.len() <= 5 && port.bytes().all(abnf::is_digit) => Some(port.parse().ok()?),
        Some(..) => return None,
    };

    Some(Authority { user_info, host, port })
}

/// Percent-encode every octet that isn't unreserved, a sub-delimiter or in
/// `extra`. Existing percent-encoded triplets are kept as they are.
///
/// ```text
/// unreserved  = ALPHA / DIGIT / "-" / "." / "_" / "~"
/// sub-delims  = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="
/// ```
fn percent_encode(input: &str, extra: &[u8]) -> String {
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b'%'
                && bytes.get(index + 1).copied().is_some_and(abnf::is_hex_digit)
                && bytes.get(index + 2).copied().is_some_and(abnf::is_hex_digit) {
            output.push_str(&input[index..index + 3]);
            index += 3;
            continue;
        }

        let allowed = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'.' | b'_' | b'~')
            || matches!(byte, b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=')
            || extra.contains(&byte);
        if allowed {
            output.push(byte as char);
        } else {
            _ = write!(output, "%{byte:02X}");
        }
        index += 1;
    }
    output
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }

        let authority = self.authority();
        if !authority.is_empty() {
            write!(f, "//{authority}")?;
        }

        if !authority.is_empty() && !self.path.is_empty() && !self.path.starts_with('/') {
            write!(f, "/{}", self.path)?;
        } else if authority.is_empty() && self.path.starts_with("//") {
            write!(f, "/{}", self.path.trim_start_matches('/'))?;
        } else {
            f.write_str(&self.path)?;
        }

        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }

        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }

        Ok(())
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.user_info == other.user_info
            && self.host == other.host
            && self.port() == other.port()
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Uri {}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}
