// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::ffi::OsString;

/// The server/environment parameters delivered by the hosting environment,
/// e.g. the CGI meta-variables `REQUEST_URI`, `SERVER_NAME` and `HTTP_*`.
///
/// The keys are case-sensitive and keep the order in which they were
/// inserted.
///
/// # References
/// * [RFC 3875 Section 4.1](https://www.rfc-editor.org/rfc/rfc3875.html#section-4.1)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerParams {
    entries: Vec<(String, String)>,
}

impl ServerParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the environment of the current process, which is where a CGI
    /// host puts the meta-variables.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Raw header bytes that aren't UTF-8, such as Latin-1 `obs-text`, are
    /// replaced with `U+FFFD`.
    fn from_os_vars<I>(vars: I) -> Self
            where I: IntoIterator<Item = (OsString, OsString)> {
        vars.into_iter()
            .map(|(key, value)| (lossy_string(key), lossy_string(value)))
            .collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value if the key is present, even when the value is empty,
    /// and the default otherwise.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Is the value present and neither empty nor `"0"`? Environments signal
    /// flags such as `IIS_WasUrlRewritten` this way.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        matches!(self.get(key), Some(value) if !value.is_empty() && value != "0")
    }

    /// Set the value, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ServerParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ServerParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for ServerParams {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

fn lossy_string(value: OsString) -> String {
    value.into_string().unwrap_or_else(|raw| {
        log::debug!("Server parameter {raw:?} is not valid UTF-8");
        raw.to_string_lossy().into_owned()
    })
}
