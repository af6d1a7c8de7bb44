// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt;

use phf::phf_map;
use unicase::UniCase;

use crate::{
    syntax,
    Error,
};

/// The request method. Methods outside of the registry below are kept
/// verbatim in [`Method::Other`], as long as they are valid tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Other(String),
    Connect,
    Delete,
    #[default]
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Parse and validate a method token. Registered methods are matched
    /// case-insensitively and normalized to their upper-case spelling.
    ///
    /// ```text
    /// method         = token
    /// ```
    ///
    /// # References
    /// * [RFC 9110 - Section 9. Methods](https://www.rfc-editor.org/rfc/rfc9110.html#section-9)
    pub fn parse(value: &str) -> Result<Self, Error> {
        syntax::validate_token(value)
            .map_err(|cause| Error::InvalidMethod { method: value.to_string(), cause })?;

        Ok(match METHOD_MAP.get(&UniCase::ascii(value)) {
            Some(method) => method.clone(),
            None => Method::Other(value.to_string()),
        })
    }

    /// Get the method in string form.
    ///
    /// # References
    /// * [IANA Hypertext Transfer Protocol (HTTP) Method Registry](https://www.iana.org/assignments/http-methods/http-methods.xhtml)
    pub fn as_string(&self) -> &str {
        match self {
            Self::Other(str) => str,
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }
}

static METHOD_MAP: phf::Map<UniCase<&'static str>, Method> = phf_map!(
    UniCase::ascii("connect") => Method::Connect,
    UniCase::ascii("delete") => Method::Delete,
    UniCase::ascii("get") => Method::Get,
    UniCase::ascii("head") => Method::Head,
    UniCase::ascii("options") => Method::Options,
    UniCase::ascii("patch") => Method::Patch,
    UniCase::ascii("post") => Method::Post,
    UniCase::ascii("put") => Method::Put,
    UniCase::ascii("trace") => Method::Trace,
);

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_string())
    }
}

impl TryFrom<&str> for Method {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Method::parse(value)
    }
}

impl TryFrom<String> for Method {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Method::parse(&value)
    }
}
