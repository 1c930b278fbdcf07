//! Spreadsheet Writer — one styled `Requirements` sheet per extraction run.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, XlsxError};
use thiserror::Error;

use crate::models::requirement::RequirementRecord;

pub const SHEET_NAME: &str = "Requirements";
pub const HEADERS: [&str; 4] = ["Requirement ID", "Section", "Keyword", "Requirement Text"];

const HEADER_FILL: u32 = 0x4F81BD;
const ALTERNATE_FILL: u32 = 0xDCE6F1;
const MAX_COLUMN_WIDTH: usize = 60;
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("xlsx writer error: {0}")]
    Xlsx(#[from] XlsxError),
}

fn row_values(record: &RequirementRecord) -> [&str; 4] {
    [
        record.id.as_str(),
        record.section.as_str(),
        record.keyword.as_str(),
        record.text.as_str(),
    ]
}

/// Shading applies to even absolute (1-based) sheet rows. The header is row 1,
/// so the first data row (row 2) is shaded.
pub fn is_shaded(row_index: u32) -> bool {
    (row_index + 1) % 2 == 0
}

/// `min(longest value + padding, cap)` per column, header included.
pub fn column_widths(records: &[RequirementRecord]) -> [usize; 4] {
    let mut longest = HEADERS.map(|h| h.chars().count());
    for record in records {
        for (col, value) in row_values(record).iter().enumerate() {
            longest[col] = longest[col].max(value.chars().count());
        }
    }
    longest.map(|len| (len + COLUMN_PADDING).min(MAX_COLUMN_WIDTH))
}

/// Renders the workbook to `.xlsx` bytes.
///
/// Callers short-circuit on an empty record list; given one anyway, this
/// produces a header-only sheet.
pub fn render_workbook(records: &[RequirementRecord]) -> Result<Vec<u8>, SpreadsheetError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);
    let shaded_format = body_format
        .clone()
        .set_background_color(Color::RGB(ALTERNATE_FILL))
        .set_pattern(FormatPattern::Solid);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let format = if is_shaded(row) {
            &shaded_format
        } else {
            &body_format
        };
        for (col, value) in row_values(record).iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, *value, format)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    for (col, width) in column_widths(records).iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}
