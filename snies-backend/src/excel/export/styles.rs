//! Cell formats of the SNIES template
//!
//! The header block is styled cell by cell before any merge is applied,
//! so `header_format` classifies a (row, col) position into the exact
//! fill / font / border combination the official workbook uses.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use super::layout::col;

// Template fills (ARGB in the original, RGB here).
const GREY_LIGHT: Color = Color::RGB(0xD8D8D8);
const GREY_MID: Color = Color::RGB(0xD9D9D9);
const GREY_DARK: Color = Color::RGB(0x595959);
const BLUE: Color = Color::RGB(0xCFE2F3);
const YELLOW: Color = Color::RGB(0xFFF2CC);
const PEACH: Color = Color::RGB(0xF7CAAC);

fn arial(size: f64, bold: bool) -> Format {
    let f = Format::new().set_font_name("Arial").set_font_size(size);
    if bold { f.set_bold() } else { f }
}

fn centered(f: Format) -> Format {
    f.set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// Title cell A1, merged across the full width of the sheet.
pub fn title_format() -> Format {
    arial(20.0, true)
        .set_background_color(GREY_LIGHT)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Medium)
}

/// Plain data cell from row 7 down.
pub fn data_format() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

/// Data cell carrying an Excel serial date, rendered as dd/mm/yyyy.
pub fn date_format() -> Format {
    data_format().set_num_format("dd/mm/yyyy")
}

/// Format for a header cell at (row, col), both 0-based, rows 3..=6 of
/// the template. Starts from the closed thin-border base and applies the
/// block overrides in the same order the template does.
pub fn header_format(row: u32, c: u16) -> Format {
    let base = centered(arial(12.0, false)).set_border(FormatBorder::Thin);

    match row {
        // Template row 3: block banners.
        2 => {
            if c == col("V") {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_border(FormatBorder::Thin)
                    .set_border_bottom(FormatBorder::None)
            } else if c == col("BR") || c == col("BU") || c == col("BX") {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_border(FormatBorder::Thin)
            } else {
                base
            }
        }
        // Template row 4: beneficiary-type and classification groups.
        3 => {
            if c == col("P") {
                base.set_border_left(FormatBorder::Medium)
                    .set_border_right(FormatBorder::Medium)
                    .set_border_top(FormatBorder::Medium)
            } else if (col("V")..=col("AR")).contains(&c) {
                let f = centered(arial(12.0, true))
                    .set_background_color(GREY_MID)
                    .set_border(FormatBorder::Thin)
                    .set_border_top(FormatBorder::Medium);
                if c == col("V") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("AS")..=col("AX")).contains(&c) {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_border(FormatBorder::Thin)
                    .set_border_top(FormatBorder::Medium)
            } else if (col("AY")..=col("BE")).contains(&c) {
                let f = centered(arial(12.0, true))
                    .set_border(FormatBorder::Thin)
                    .set_border_top(FormatBorder::Medium);
                if c == col("AY") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("BF")..=col("BH")).contains(&c) {
                let f = centered(arial(12.0, true))
                    .set_background_color(PEACH)
                    .set_border(FormatBorder::Thin)
                    .set_border_top(FormatBorder::Medium);
                if c == col("BH") {
                    f.set_border_right(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("BI")..=col("BO")).contains(&c) {
                let f = centered(arial(12.0, true))
                    .set_border(FormatBorder::Thin)
                    .set_border_top(FormatBorder::Medium);
                let f = if c == col("BI") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                };
                if c == col("BO") {
                    f.set_border_right(FormatBorder::Medium)
                } else {
                    f
                }
            } else if c == col("BP") || c == col("BQ") {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_rotation(90)
                    .set_border(FormatBorder::Thin)
                    .set_border_left(FormatBorder::Medium)
                    .set_border_right(FormatBorder::Medium)
                    .set_border_top(FormatBorder::Medium)
            } else {
                base
            }
        }
        // Template row 5: main headers, programs and totals.
        4 => {
            if c <= col("I") {
                // E and G (places and names) wrap left, the rest center.
                let f = arial(12.0, true)
                    .set_background_color(BLUE)
                    .set_border(FormatBorder::Thin)
                    .set_align(FormatAlign::VerticalCenter)
                    .set_text_wrap();
                if c == col("E") || c == col("G") {
                    f.set_align(FormatAlign::Left)
                } else {
                    f.set_align(FormatAlign::Center)
                }
            } else if c == col("J") {
                centered(arial(12.0, true))
                    .set_background_color(YELLOW)
                    .set_border(FormatBorder::Thin)
            } else if (col("P")..=col("U")).contains(&c) {
                let f = base.set_background_color(PEACH).set_rotation(90);
                let f = if c == col("P") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                };
                if c == col("U") {
                    f.set_border_right(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("V")..=col("AR")).contains(&c) {
                let f = base.set_background_color(GREY_MID);
                if c == col("V") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("AS")..=col("AX")).contains(&c) {
                base.set_background_color(GREY_LIGHT)
            } else if (col("AY")..=col("BE")).contains(&c) {
                let f = base.set_rotation(90);
                if c == col("AY") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("BF")..=col("BH")).contains(&c) {
                let f = base.set_background_color(PEACH).set_rotation(90);
                if c == col("BH") {
                    f.set_border_right(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("BI")..=col("BO")).contains(&c) {
                let f = base.set_rotation(90);
                let f = if c == col("BI") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                };
                if c == col("BO") {
                    f.set_border_right(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("BR")..=col("CA")).contains(&c) {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_border(FormatBorder::Thin)
            } else {
                base
            }
        }
        // Template row 6: CINE codes and education levels.
        5 => {
            if c == col("J") {
                arial(12.0, true)
                    .set_background_color(GREY_DARK)
                    .set_font_color(Color::White)
                    .set_align(FormatAlign::VerticalCenter)
                    .set_text_wrap()
                    .set_border(FormatBorder::Thin)
            } else if c == col("L") || c == col("N") {
                centered(arial(12.0, true))
                    .set_background_color(GREY_DARK)
                    .set_font_color(Color::White)
                    .set_border(FormatBorder::Thin)
            } else if c == col("K") || c == col("M") || c == col("O") {
                centered(arial(12.0, true))
                    .set_background_color(GREY_LIGHT)
                    .set_border(FormatBorder::Thin)
            } else if (col("V")..=col("AR")).contains(&c) {
                let f = base.set_background_color(GREY_MID).set_rotation(90);
                if c == col("V") {
                    f.set_border_left(FormatBorder::Medium)
                } else {
                    f
                }
            } else if (col("AS")..=col("AX")).contains(&c) {
                base.set_background_color(GREY_LIGHT).set_rotation(90)
            } else {
                base
            }
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_format_is_total_over_the_grid() {
        // Every header cell must classify without panicking.
        for row in 2..=5u32 {
            for c in 0..=col("CA") {
                let _ = header_format(row, c);
            }
        }
    }
}
