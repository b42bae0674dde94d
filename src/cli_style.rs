use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let heading = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Blue)));
    let good = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(good)
        .valid(good)
        .invalid(bad)
        .error(bad)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const BLUE: Color = Color::Rgb {
        r: 37,
        g: 99,
        b: 235,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 34,
        g: 197,
        b: 94,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 249,
        g: 115,
        b: 22,
    };
    pub const RED: Color = Color::Rgb {
        r: 239,
        g: 68,
        b: 68,
    };
    pub const DIM: Color = Color::Rgb {
        r: 107,
        g: 114,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 243,
        g: 244,
        b: 246,
    };
}

mod glyphs {
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const BULLET: &str = "●";
    pub const RULE: &str = "─";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        glyphs::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    eprintln!(
        " {} {}",
        glyphs::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        glyphs::WARNING.with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        glyphs::INFO.with(colors::BLUE).bold(),
        message.with(colors::BLUE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let width: usize = 48;
    let rule = glyphs::RULE.repeat(width.saturating_sub(title.width() + 3));

    println!();
    println!(
        "{} {} {}",
        glyphs::RULE.with(colors::BLUE),
        title.with(colors::BLUE).bold().attribute(Attribute::Italic),
        rule.with(colors::BLUE)
    );
}

pub fn print_key_value(key: &str, value: &str) {
    let padding = 14usize.saturating_sub(key.width());
    println!(
        "   {}{} {}",
        key.with(colors::DIM),
        " ".repeat(padding),
        value.with(colors::WHITE)
    );
}

pub fn print_list_item(item: &str) {
    println!("   {} {}", glyphs::BULLET.with(colors::DIM), item);
}
