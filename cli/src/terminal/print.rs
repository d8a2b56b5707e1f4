use colored::*;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{}", msg);
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

/// `key.....: [a b]`, with the dots padding `key` to `key_width`.
pub fn aligned_list(key: &str, values: &[String], key_width: usize, value_color: fn(&str) -> Color) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.chars().count()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let list: String = values
        .iter()
        .map(|value| value.color(value_color(value)).to_string())
        .collect::<Vec<String>>()
        .join(" ");

    print_status(format!(
        "{}{} {}{}{}",
        key.color(colors::PRIMARY),
        colon,
        "[".color(colors::SEPARATOR),
        list,
        "]".color(colors::SEPARATOR)
    ));
}

pub fn address_color(address: &str) -> Color {
    if address.contains(':') {
        colors::IPV6_ADDR
    } else {
        colors::IPV4_ADDR
    }
}

pub fn range_color(_range: &str) -> Color {
    colors::RANGE
}
