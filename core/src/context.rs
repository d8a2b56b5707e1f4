//! # Render Context
//!
//! Values visible to a template: every resolved service, keyed by its name,
//! and the configured ranges under the reserved [`RANGES_KEY`].
//!
//! Services and ranges are stored apart. They only meet in the key space a
//! template sees, where `Ranges` is bound to the ranges whenever at least
//! one range is configured, hiding a service that happens to share the name.

use std::collections::BTreeMap;
use std::fmt;

pub const RANGES_KEY: &str = "Ranges";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    services: BTreeMap<String, Vec<String>>,
    ranges: Vec<String>,
}

impl RenderContext {
    pub fn new(ranges: Vec<String>) -> Self {
        Self {
            services: BTreeMap::new(),
            ranges,
        }
    }

    pub fn insert_service(&mut self, name: impl Into<String>, addresses: Vec<String>) {
        self.services.insert(name.into(), addresses);
    }

    pub fn services(&self) -> &BTreeMap<String, Vec<String>> {
        &self.services
    }

    pub fn ranges(&self) -> &[String] {
        &self.ranges
    }

    /// True when a service named like the reserved key is hidden by the ranges.
    pub fn is_shadowed(&self, service: &str) -> bool {
        service == RANGES_KEY && !self.ranges.is_empty()
    }

    /// Looks a key up the way a template does.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        if key == RANGES_KEY && !self.ranges.is_empty() {
            return Some(&self.ranges);
        }
        self.services.get(key).map(Vec::as_slice)
    }

    /// Visible keys with their values, sorted by key.
    pub fn entries(&self) -> Vec<(&str, &[String])> {
        let mut entries: Vec<(&str, &[String])> = self
            .services
            .iter()
            .filter(|(name, _)| !self.is_shadowed(name))
            .map(|(name, addresses)| (name.as_str(), addresses.as_slice()))
            .collect();

        if !self.ranges.is_empty() {
            entries.push((RANGES_KEY, &self.ranges));
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        entries
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.ranges.is_empty()
    }
}

/// Prints as `map[key:[a b] other:[c]]`.
impl fmt::Display for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("map[")?;
        for (idx, (key, values)) in self.entries().into_iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", key, ListDisplay(values))?;
        }
        f.write_str("]")
    }
}

/// Prints a sequence as `[a b c]`.
pub struct ListDisplay<'a>(pub &'a [String]);

impl fmt::Display for ListDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}
