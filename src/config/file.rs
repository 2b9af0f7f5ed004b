//! Configuration file loading
//!
//! Reads INI files with `rust-ini` and exposes them as case-insensitive
//! sections of string values.

use crate::error::ConfigError;

use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// A parsed INI file
#[derive(Debug, Clone)]
pub struct IniDocument {
    path: String,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    /// Load an INI file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        Self::parse(&path.display().to_string(), &content)
    }

    /// Parse INI text; `path` is only used in error messages
    ///
    /// Values are kept as written; backslashes and quotes are not interpreted.
    pub fn parse(path: &str, content: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::ParseError {
            path: path.to_string(),
            message,
        };

        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| parse_error(e.to_string()))?;

        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (name, properties) in ini.iter() {
            let Some(name) = name else {
                if let Some((key, _)) = properties.iter().next() {
                    return Err(parse_error(format!(
                        "key '{}' is outside of any section",
                        key
                    )));
                }
                continue;
            };

            let entries = sections.entry(name.trim().to_lowercase()).or_default();
            for (key, value) in properties.iter() {
                entries.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Ok(Self {
            path: path.to_string(),
            sections,
        })
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<Section<'_>> {
        let name = name.to_lowercase();
        self.sections
            .get_key_value(&name)
            .map(|(name, values)| Section { name, values })
    }

    /// Look up a section that must exist
    pub fn require_section(&self, name: &str) -> Result<Section<'_>, ConfigError> {
        self.section(name).ok_or_else(|| ConfigError::MissingSection {
            section: name.to_string(),
            path: self.path.clone(),
        })
    }

    /// All sections whose name starts with `prefix`, in name order.
    ///
    /// Yields `(suffix, section)` pairs, where `suffix` is the part of the
    /// name after the prefix.
    pub fn sections_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, Section<'a>)> + 'a {
        self.sections.iter().filter_map(move |(name, values)| {
            name.strip_prefix(prefix)
                .filter(|suffix| !suffix.is_empty())
                .map(|suffix| (suffix, Section { name, values }))
        })
    }
}

/// One `[section]` of an INI document
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    name: &'a str,
    values: &'a BTreeMap<String, String>,
}

impl<'a> Section<'a> {
    /// Keys present in this section
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.values.keys().map(String::as_str)
    }

    /// Get a value; blank values count as absent
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values
            .get(&key.to_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Get a value that must be present
    pub fn require(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingField(self.qualified(key)))
    }

    /// Parse an optional value
    pub fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                    key: self.qualified(key),
                    message: format!("'{}': {}", raw, e),
                })
            })
            .transpose()
    }

    /// Parse a value, falling back to `default` when absent
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }

    /// Split a comma-separated list, dropping blanks
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `section.key`, for error messages
    pub fn qualified(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }
}
