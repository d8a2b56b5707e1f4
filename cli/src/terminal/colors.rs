use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 0, g: 200, b: 170 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const ACCENT: Color = Color::Yellow;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV6_ADDR: Color = Color::BrightMagenta;
pub const RANGE: Color = Color::BrightCyan;
