//! # dns2ip-core
//!
//! The pipeline behind `dns2ip-templater`:
//!
//! * **[`config`]**: loads the YAML list of services and ranges.
//! * **[`resolver`]**: turns service names into addresses.
//! * **[`context`]**: the values a template can reference.
//! * **[`template`]**: parses and executes Go-style templates.
//! * **[`render`]**: writes a rendered template to disk.
//! * **[`pipeline`]**: one load, resolve, render pass.
//! * **[`scheduler`]**: runs the pass once or on an interval.

pub mod config;
pub mod context;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod scheduler;
pub mod template;
