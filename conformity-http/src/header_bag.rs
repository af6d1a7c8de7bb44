// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use unicase::UniCase;

use crate::{
    syntax,
    Error,
};

/// A case-insensitive, order-preserving collection of header fields.
///
/// Lookups, presence checks and removal ignore the case of the name. The
/// name is rendered in the case used when it was first inserted. A header
/// that is present always carries at least one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<HeaderEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct HeaderEntry {
    name: UniCase<String>,
    values: Vec<String>,
}

impl HeaderBag {
    pub fn new() -> HeaderBag {
        HeaderBag::default()
    }

    /// Build a bag from `(name, value)` pairs. Pairs sharing a name
    /// (case-insensitively) are combined in the order they appear.
    pub fn try_from_pairs<I, N, V>(pairs: I) -> Result<HeaderBag, Error>
            where I: IntoIterator<Item = (N, V)>,
                  N: Into<String>,
                  V: Into<String> {
        let mut bag = HeaderBag::new();
        for (name, value) in pairs {
            let (name, value) = (name.into(), value.into());
            validate_header(&name, &value)?;
            bag.append(name, value);
        }
        Ok(bag)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the values of the header, or an empty slice when the header
    /// isn't present.
    #[must_use]
    pub fn get(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => &self.entries[index].values,
            None => &[],
        }
    }

    /// Returns the first value of the header.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    /// Returns the values of the header joined by a comma, or the empty
    /// string when the header isn't present.
    #[must_use]
    pub fn line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The amount of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Replace all values of the header with the given value.
    pub fn with(&self, name: &str, value: &str) -> Result<HeaderBag, Error> {
        self.with_values(name, [value])
    }

    /// Replace all values of the header. Giving no values at all removes the
    /// header.
    pub fn with_values<I, V>(&self, name: &str, values: I) -> Result<HeaderBag, Error>
            where I: IntoIterator<Item = V>,
                  V: Into<String> {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        validate_name(name)?;
        for value in &values {
            validate_value(name, value)?;
        }

        if values.is_empty() {
            return Ok(self.without(name));
        }

        let mut bag = self.clone();
        match bag.position(name) {
            Some(index) => bag.entries[index].values = values,
            None => bag.entries.push(HeaderEntry { name: UniCase::new(name.to_string()), values }),
        }
        Ok(bag)
    }

    /// Append a value to the header, keeping the existing values.
    pub fn with_added(&self, name: &str, value: &str) -> Result<HeaderBag, Error> {
        validate_header(name, value)?;
        let mut bag = self.clone();
        bag.append(name.to_string(), value.to_string());
        Ok(bag)
    }

    #[must_use]
    pub fn without(&self, name: &str) -> HeaderBag {
        let mut bag = self.clone();
        bag.entries.retain(|entry| entry.name != UniCase::new(name));
        bag
    }

    fn append(&mut self, name: String, value: String) {
        match self.position(&name) {
            Some(index) => self.entries[index].values.push(value),
            None => self.entries.push(HeaderEntry { name: UniCase::new(name), values: vec![value] }),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == UniCase::new(name))
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), Error> {
    validate_name(name)?;
    validate_value(name, value)
}

fn validate_name(name: &str) -> Result<(), Error> {
    syntax::validate_token(name)
        .map_err(|cause| Error::InvalidHeaderName { name: name.to_string(), cause })
}

fn validate_value(name: &str, value: &str) -> Result<(), Error> {
    syntax::validate_field_content(value.as_bytes())
        .map_err(|cause| Error::InvalidHeaderValue { name: name.to_string(), cause })
}
