// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    fmt,
    time::{Duration, SystemTime},
};

use crate::{
    syntax,
    Error,
};

/// How far in the past the expiry of a deleted cookie is put.
const DELETION_EXPIRY_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A cookie to be sent to the client in a `Set-Cookie` header.
///
/// A cookie without a value, or with an expiry in the past, is rendered as a
/// deletion directive: the value becomes `deleted` and the expiry is forced
/// into the past.
///
/// # References
/// * [RFC 6265 Section 4.1](https://www.rfc-editor.org/rfc/rfc6265.html#section-4.1)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: Option<String>,
    expires: Option<SystemTime>,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    /// Create a cookie with an empty value, the path `/` and the `HttpOnly`
    /// attribute.
    pub fn new(name: &str) -> Result<Self, Error> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            value: Some(String::new()),
            expires: None,
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            http_only: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn expires(&self) -> Option<SystemTime> {
        self.expires
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn with_name(self, name: &str) -> Result<Self, Error> {
        validate_name(name)?;
        Ok(Self { name: name.to_string(), ..self })
    }

    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        Self { value: Some(value.into()), ..self }
    }

    #[must_use]
    pub fn without_value(self) -> Self {
        Self { value: None, ..self }
    }

    #[must_use]
    pub fn with_expires(self, expires: SystemTime) -> Self {
        Self { expires: Some(expires), ..self }
    }

    #[must_use]
    pub fn without_expires(self) -> Self {
        Self { expires: None, ..self }
    }

    #[must_use]
    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self { path: Some(path.into()), ..self }
    }

    #[must_use]
    pub fn without_path(self) -> Self {
        Self { path: None, ..self }
    }

    #[must_use]
    pub fn with_domain(self, domain: impl Into<String>) -> Self {
        Self { domain: Some(domain.into()), ..self }
    }

    #[must_use]
    pub fn without_domain(self) -> Self {
        Self { domain: None, ..self }
    }

    #[must_use]
    pub fn with_secure(self, secure: bool) -> Self {
        Self { secure, ..self }
    }

    #[must_use]
    pub fn with_http_only(self, http_only: bool) -> Self {
        Self { http_only, ..self }
    }

    /// Does this cookie instruct the client to delete it?
    pub fn is_delete(&self) -> bool {
        self.is_delete_at(SystemTime::now())
    }

    fn is_delete_at(&self, now: SystemTime) -> bool {
        self.value.is_none() || self.expires.is_some_and(|expires| expires < now)
    }

    /// Render the `Set-Cookie` header value as of the given moment.
    ///
    /// ```text
    /// name=value; expires=<IMF-fixdate>; path=<path>; domain=<domain>; secure; httponly
    /// ```
    pub fn render_at(&self, now: SystemTime) -> String {
        let mut parts = Vec::new();
        let mut expires = self.expires;

        let value = match &self.value {
            Some(value) if !self.is_delete_at(now) => urlencoding::encode(value).into_owned(),
            _ => {
                if expires.map_or(true, |expires| expires > now) {
                    expires = Some(now.checked_sub(DELETION_EXPIRY_AGE).unwrap_or(SystemTime::UNIX_EPOCH));
                }
                "deleted".to_string()
            }
        };
        parts.push(format!("{}={value}", urlencoding::encode(&self.name)));

        if let Some(expires) = expires {
            parts.push(format!("expires={}", httpdate::fmt_http_date(expires)));
        }

        if let Some(path) = &self.path {
            parts.push(format!("path={path}"));
        }

        if let Some(domain) = &self.domain {
            parts.push(format!("domain={domain}"));
        }

        if self.secure {
            parts.push("secure".to_string());
        }

        if self.http_only {
            parts.push("httponly".to_string());
        }

        parts.join("; ")
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(SystemTime::now()))
    }
}

fn validate_name(name: &str) -> Result<(), Error> {
    if syntax::is_valid_cookie_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidCookieName(name.to_string()))
    }
}
