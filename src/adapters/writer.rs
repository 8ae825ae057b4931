use crate::domain::model::{BoxRecord, BoxingResult, BranchSummary};
use crate::utils::error::{BoxerError, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const OUTPUT_COLUMNS: [&str; 7] = ["번호", "박스번호", "앞번호", "뒷번호", "매수", "카드명", "권종"];

const SHEET_NAME: &str = "Sheet1";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the box table as a single-sheet workbook.
///
/// Numbers and counts are numeric cells; card numbers and denominations stay text.
pub fn write_xlsx(boxes: &[BoxRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    worksheet.set_column_width(2, 22)?;
    worksheet.set_column_width(3, 22)?;

    for (idx, record) in boxes.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| BoxerError::ProcessingError {
            message: format!("Too many boxes for one worksheet: {}", boxes.len()),
        })?;

        worksheet.write_number(row, 0, record.sequence_number as f64)?;
        worksheet.write_number(row, 1, record.box_number as f64)?;
        worksheet.write_string(row, 2, &record.front_card)?;
        worksheet.write_string(row, 3, &record.back_card)?;
        worksheet.write_number(row, 4, record.count as f64)?;
        worksheet.write_string(row, 5, &record.branch_name)?;
        worksheet.write_string(row, 6, &record.denomination)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// CSV export with a UTF-8 BOM so spreadsheet programs pick up the Korean headers.
pub fn write_csv(boxes: &[BoxRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(OUTPUT_COLUMNS)?;
    for record in boxes {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| BoxerError::IoError(e.into_error()))
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    generated_at: DateTime<Utc>,
    unit: usize,
    total_rows: usize,
    total_boxes: usize,
    branches: Vec<BranchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

pub fn write_summary_json(result: &BoxingResult, source: Option<&str>) -> Result<Vec<u8>> {
    let summary = Summary {
        generated_at: Utc::now(),
        unit: result.unit,
        total_rows: result.total_rows,
        total_boxes: result.boxes.len(),
        branches: result.branch_summaries(),
        source,
    };
    Ok(serde_json::to_vec_pretty(&summary)?)
}

pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
