//! Existing declaration scanner
//!
//! A line-oriented scan over `main.tf` that records which provider and resource
//! blocks are already declared. It is not an HCL parser: lines that do not look
//! like a block header are ignored, and malformed input never fails the scan.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::io::{self, BufRead};

lazy_static! {
    static ref PROVIDER_HEADER: Regex =
        Regex::new(r#"^\s*provider\s+"?([A-Za-z0-9_\-]+)"?\s*\{"#).unwrap();
    static ref RESOURCE_HEADER: Regex = Regex::new(
        r#"^\s*resource\s+"?([A-Za-z0-9_\-]+)"?\s+"?([A-Za-z0-9_\-]+)"?\s*\{"#
    )
    .unwrap();
}

/// Declarations found in an existing configuration file
#[derive(Debug, Clone, Default)]
pub struct DeclarationIndex {
    resources: HashMap<String, usize>,
    providers: HashMap<String, usize>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `resource TYPE NAME {` header
    pub fn add_resource(&mut self, resource_type: &str, name: &str) {
        *self
            .resources
            .entry(format!("{}.{}", resource_type, name))
            .or_insert(0) += 1;
    }

    /// Record a `provider NAME {` header
    pub fn add_provider(&mut self, name: &str) {
        *self.providers.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Whether `TYPE.NAME` is already declared
    pub fn has_resource(&self, address: &str) -> bool {
        self.resources.get(address).is_some_and(|count| *count > 0)
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.get(name).is_some_and(|count| *count > 0)
    }

    /// Number of headers seen for `TYPE.NAME`
    #[allow(dead_code)]
    pub fn resource_count(&self, address: &str) -> usize {
        self.resources.get(address).copied().unwrap_or(0)
    }

    /// Declared resource addresses, sorted
    pub fn resource_addresses(&self) -> Vec<&str> {
        let mut addresses: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        addresses.sort_unstable();
        addresses
    }

    /// Declared provider names, sorted
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Addresses declared more than once
    pub fn duplicate_resources(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = self
            .resources
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(address, _)| address.as_str())
            .collect();
        duplicates.sort_unstable();
        duplicates
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.providers.is_empty()
    }

    fn scan_line(&mut self, line: &str) {
        if let Some(caps) = PROVIDER_HEADER.captures(line) {
            self.add_provider(&caps[1]);
        }
        if let Some(caps) = RESOURCE_HEADER.captures(line) {
            self.add_resource(&caps[1], &caps[2]);
        }
    }
}

/// Scan declarations from a reader, one line at a time
pub fn scan<R: BufRead>(reader: R) -> io::Result<DeclarationIndex> {
    let mut index = DeclarationIndex::new();

    for line in reader.lines() {
        index.scan_line(&line?);
    }

    log::debug!(
        "Scanned {} resource and {} provider declarations",
        index.resources.len(),
        index.providers.len()
    );

    Ok(index)
}

/// Scan declarations from text already in memory
pub fn scan_str(text: &str) -> DeclarationIndex {
    // Lines of a &str are always valid UTF-8
    scan(text.as_bytes()).unwrap_or_default()
}
