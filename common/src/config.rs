use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONF: &str = "config.yml";
pub const DEFAULT_TEMPLATE: &str = "template.tmpl";
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Settings for one run of the templater, built from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    /// YAML file listing the services and ranges.
    pub conf: PathBuf,
    /// Template rendered on every iteration.
    pub template: PathBuf,
    /// File overwritten with the rendered template.
    pub output: PathBuf,
    /// Pause between iterations. Zero runs the pipeline once.
    pub interval: Duration,
    /// 0 prints everything, 1 hides per-service details,
    /// 2 or more keeps warnings and errors only.
    pub quiet: u8,
}

impl Config {
    pub fn is_one_shot(&self) -> bool {
        self.interval.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            conf: PathBuf::from(DEFAULT_CONF),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            interval: Duration::ZERO,
            quiet: 0,
        }
    }
}
