pub mod run;

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use dns2ip_common::config::{self, Config};
use dns2ip_common::duration;

/// Long flags that older invocations spell with a single dash (`-conf x`).
const SINGLE_DASH_FLAGS: &[&str] = &["conf", "template", "output", "interval"];

#[derive(Parser, Debug)]
#[command(name = "dns2ip-templater")]
#[command(about = "Resolve service names and render them, with static ranges, through a template.")]
#[command(version)]
pub struct CommandLine {
    /// Configuration file path
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_CONF)]
    pub conf: PathBuf,

    /// Template file path
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Rendered file path
    #[arg(long, value_name = "FILE", default_value = config::DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Interval between runs, e.g. 30s or 1h30m (by default: executed once)
    #[arg(long, value_name = "DURATION", default_value = "0", value_parser = duration::parse_duration)]
    pub interval: Duration,

    /// Print less, repeat (-qq) to keep warnings and errors only
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn into_config(self) -> Config {
        Config {
            conf: self.conf,
            template: self.template,
            output: self.output,
            interval: self.interval,
            quiet: self.quiet,
        }
    }
}

/// Rewrites `-conf` and `-conf=x` to `--conf` and `--conf=x`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-').filter(|rest| !rest.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<CommandLine, clap::Error> {
        CommandLine::try_parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_command_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(&["dns2ip-templater"]).unwrap().into_config();
        assert_eq!(cfg.conf, PathBuf::from("config.yml"));
        assert_eq!(cfg.template, PathBuf::from("template.tmpl"));
        assert_eq!(cfg.output, PathBuf::from("output.txt"));
        assert_eq!(cfg.interval, Duration::ZERO);
        assert_eq!(cfg.quiet, 0);
        assert!(cfg.is_one_shot());
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "dns2ip-templater",
            "--conf",
            "/etc/dns2ip/services.yml",
            "--template=fw.tmpl",
            "--output",
            "/tmp/fw.conf",
            "--interval",
            "1m30s",
            "-qq",
        ])
        .unwrap();

        assert_eq!(cli.conf, PathBuf::from("/etc/dns2ip/services.yml"));
        assert_eq!(cli.template, PathBuf::from("fw.tmpl"));
        assert_eq!(cli.output, PathBuf::from("/tmp/fw.conf"));
        assert_eq!(cli.interval, Duration::from_secs(90));
        assert_eq!(cli.quiet, 2);
    }

    #[test]
    fn test_single_dash_long_flags() {
        let cli = parse(&["dns2ip-templater", "-conf", "a.yml", "-interval=5s", "-q"]).unwrap();
        assert_eq!(cli.conf, PathBuf::from("a.yml"));
        assert_eq!(cli.interval, Duration::from_secs(5));
        assert_eq!(cli.quiet, 1);
    }

    #[test]
    fn test_bad_interval_is_rejected() {
        assert!(parse(&["dns2ip-templater", "--interval", "10"]).is_err());
        assert!(parse(&["dns2ip-templater", "--interval", "soon"]).is_err());
    }
}
