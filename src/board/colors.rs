use crossterm::style::Color;

// Board palette
pub fn header_bg() -> Color {
    Color::AnsiValue(21)
} // Bright blue
pub fn header_fg() -> Color {
    Color::AnsiValue(231)
} // Pure white
pub fn subheader_fg() -> Color {
    Color::AnsiValue(51)
} // Bright cyan
pub fn text_fg() -> Color {
    Color::AnsiValue(231)
} // Pure white
pub fn green_line_fg() -> Color {
    Color::AnsiValue(46)
} // Bright green
pub fn yellow_line_fg() -> Color {
    Color::AnsiValue(226)
} // Bright yellow

/// Row colour of a Metro line, white for lines without one
pub fn line_fg(line: &str) -> Color {
    match line.trim().to_ascii_uppercase().as_str() {
        "GREEN" => green_line_fg(),
        "YELLOW" => yellow_line_fg(),
        _ => text_fg(),
    }
}

/// ANSI 256-colour code of a crossterm colour, `fallback` for other colours.
pub fn get_ansi_code(color: Color, fallback: u8) -> u8 {
    match color {
        Color::AnsiValue(val) => val,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_colours() {
        assert_eq!(line_fg("GREEN"), green_line_fg());
        assert_eq!(line_fg("yellow"), yellow_line_fg());
        assert_eq!(line_fg("BLUE"), text_fg());
        assert_eq!(line_fg(""), text_fg());
    }

    #[test]
    fn test_get_ansi_code() {
        assert_eq!(get_ansi_code(Color::AnsiValue(46), 0), 46);
        assert_eq!(get_ansi_code(Color::Red, 231), 231);
    }
}
