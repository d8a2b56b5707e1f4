use colored::*;
use dns2ip_common::SUCCESS_TARGET;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, DefaultFields, Writer};
use tracing_subscriber::fmt::{FormatEvent, SubscriberBuilder};
use tracing_subscriber::registry::LookupSpan;

/// Events on this target are printed as-is, without a status symbol.
pub const PRINT_TARGET: &str = "dns2ip::print";

pub struct Dns2IpFormatter;

impl<S, N> FormatEvent<S, N> for Dns2IpFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func) = status_symbol(meta.level(), meta.target());
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

fn status_symbol(level: &Level, target: &str) -> (&'static str, fn(ColoredString) -> ColoredString) {
    if target == SUCCESS_TARGET {
        return ("[+]", |s| s.green().bold());
    }
    match *level {
        Level::TRACE => ("[ ]", |s| s.dimmed()),
        Level::DEBUG => ("[?]", |s| s.blue()),
        Level::INFO => ("[*]", |s| s.cyan().bold()),
        Level::WARN => ("[!]", |s| s.yellow().bold()),
        Level::ERROR => ("[-]", |s| s.red().bold()),
    }
}

pub fn default_filter(q_level: u8) -> &'static str {
    match q_level {
        0 | 1 => "info",
        _ => "warn",
    }
}

pub fn subscriber_builder(
    filter: EnvFilter,
) -> SubscriberBuilder<DefaultFields, Dns2IpFormatter, EnvFilter> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(Dns2IpFormatter)
}

/// `RUST_LOG` wins over the level picked from `--quiet`.
pub fn init_logging(q_level: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(q_level)));

    subscriber_builder(filter)
        .try_init()
        .map_err(anyhow::Error::msg)
}

/// Collects formatted log lines so tests can inspect them.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLog {
    /// Installs a subscriber writing into this log on the current thread.
    pub fn install(&self, q_level: u8) -> tracing::subscriber::DefaultGuard {
        colored::control::set_override(false);
        let log = self.clone();
        let subscriber = subscriber_builder(EnvFilter::new(default_filter(q_level)))
            .with_writer(move || log.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
