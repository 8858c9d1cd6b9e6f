//! Workbook writer for the SNIES "Software" template
//!
//! Rebuilds the official template from scratch on every export: title,
//! six header rows with their merges and fills, frozen panes, then one
//! data row per activity starting at row 7.

pub mod layout;
pub mod styles;

use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::domain::{BeneficiaryBreakdown, EducationLevel, Population, SoftwareActivity};
use crate::excel::normalize::norm_key;
use crate::excel::serial::date_to_serial;
use crate::excel::{EXPORT_FILENAME, XLSX_CONTENT_TYPE};
use layout::{
    cell_ref, col, header_labels, range_ref, CUCUTA_STUDENT_COLS, COL_WIDTHS, DATA_START_ROW,
    GRADUATE_CUCUTA_COLS, GRADUATE_OCANA_COLS, HEADER_FIRST_ROW, HEADER_LAST_ROW, HEADER_MERGES,
    LAST_COL, OCANA_STUDENT_COLS, PROFESSOR_COLS, ROW_HEIGHTS, SHEET_NAME, TITLE,
};

/// Finished workbook plus the HTTP metadata a download response needs.
pub struct ExportResult {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

fn yes_no(v: bool) -> &'static str {
    if v { "SI" } else { "NO" }
}

/// Count for an exact (population, campus, program, level) cell.
/// Campus and program match accent- and case-insensitively.
fn bd_get(
    bds: &[BeneficiaryBreakdown],
    population: Population,
    campus: &str,
    program: &str,
    level: EducationLevel,
) -> Option<i32> {
    let nc = norm_key(campus);
    let np = norm_key(program);
    bds.iter()
        .find(|b| {
            b.population == population
                && b.level == level
                && norm_key(&b.campus) == nc
                && norm_key(&b.program) == np
        })
        .map(|b| b.count)
}

/// Count for a (population, campus, program) column with no level split.
fn bd_get_any_level(
    bds: &[BeneficiaryBreakdown],
    population: Population,
    campus: &str,
    program: &str,
) -> Option<i32> {
    let nc = norm_key(campus);
    let np = norm_key(program);
    bds.iter()
        .find(|b| {
            b.population == population
                && norm_key(&b.campus) == nc
                && norm_key(&b.program) == np
        })
        .map(|b| b.count)
}

fn sum_pop(bds: &[BeneficiaryBreakdown], population: Population) -> i32 {
    bds.iter()
        .filter(|b| b.population == population)
        .map(|b| b.count)
        .sum()
}

fn nonzero(n: i32) -> Option<i32> {
    if n != 0 { Some(n) } else { None }
}

fn write_text(ws: &mut Worksheet, row: u32, c: u16, v: &str, fmt: &Format) -> Result<()> {
    ws.write_string_with_format(row, c, v, fmt)?;
    Ok(())
}

fn write_opt_text(
    ws: &mut Worksheet,
    row: u32,
    c: u16,
    v: Option<&str>,
    fmt: &Format,
) -> Result<()> {
    write_text(ws, row, c, v.unwrap_or(""), fmt)
}

/// Counts render as numbers; absent ones as empty bordered cells.
fn write_count(ws: &mut Worksheet, row: u32, c: u16, v: Option<i32>, fmt: &Format) -> Result<()> {
    match v {
        Some(n) => ws.write_number_with_format(row, c, n as f64, fmt)?,
        None => ws.write_blank(row, c, fmt)?,
    };
    Ok(())
}

fn write_header_block(ws: &mut Worksheet) -> Result<()> {
    ws.set_name(SHEET_NAME)?;

    for (row, height) in ROW_HEIGHTS {
        ws.set_row_height(*row, *height)?;
    }
    for (letter, width) in COL_WIDTHS {
        ws.set_column_width(col(letter), *width)?;
    }

    // Close every header cell with its format before merging, so no
    // border ends up cut in half inside a merged range.
    let labels = header_labels();
    for row in HEADER_FIRST_ROW..=HEADER_LAST_ROW {
        for c in 0..=LAST_COL {
            let fmt = styles::header_format(row, c);
            match labels.get(&(row, c)) {
                Some(text) => ws.write_string_with_format(row, c, *text, &fmt)?,
                None => ws.write_blank(row, c, &fmt)?,
            };
        }
    }

    for m in HEADER_MERGES {
        let ((r1, c1), (r2, c2)) = range_ref(m);
        if (r1, c1) == cell_ref("A1") {
            ws.merge_range(r1, c1, r2, c2, TITLE, &styles::title_format())?;
        } else {
            let text = labels.get(&(r1, c1)).copied().unwrap_or("");
            ws.merge_range(r1, c1, r2, c2, text, &styles::header_format(r1, c1))?;
        }
    }

    ws.set_freeze_panes(DATA_START_ROW, 0)?;
    Ok(())
}

fn write_data_row(
    ws: &mut Worksheet,
    row: u32,
    a: &SoftwareActivity,
    bds: &[BeneficiaryBreakdown],
) -> Result<()> {
    let fmt = styles::data_format();
    let date_fmt = styles::date_format();

    ws.write_number_with_format(row, col("A"), a.year as f64, &fmt)?;
    ws.write_number_with_format(row, col("B"), a.semester as f64, &fmt)?;
    for (letter, date) in [("C", a.start_date), ("D", a.end_date)] {
        match date {
            Some(d) => ws.write_number_with_format(row, col(letter), date_to_serial(d) as f64, &date_fmt)?,
            None => ws.write_blank(row, col(letter), &fmt)?,
        };
    }
    write_text(ws, row, col("E"), &a.execution_place, &fmt)?;
    write_text(ws, row, col("F"), &a.campus, &fmt)?;
    write_text(ws, row, col("G"), &a.activity_name, &fmt)?;
    write_opt_text(ws, row, col("H"), a.agreement_entity.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("I"), a.description.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("J"), a.cine_isced_name.as_deref(), &fmt)?;
    write_count(ws, row, col("K"), a.num_hours.and_then(nonzero), &fmt)?;
    write_opt_text(ws, row, col("L"), a.activity_type.as_deref(), &fmt)?;
    match &a.course_value {
        Some(v) => write_text(ws, row, col("M"), &v.to_string(), &fmt)?,
        None => write_text(ws, row, col("M"), "", &fmt)?,
    }
    write_opt_text(ws, row, col("N"), a.teacher_document_type.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("O"), a.teacher_document_number.as_deref(), &fmt)?;

    // Beneficiary-type totals: student and graduate columns aggregate the
    // breakdowns, the rest come from the activity's own counters.
    write_count(ws, row, col("P"), nonzero(sum_pop(bds, Population::Students)), &fmt)?;
    write_count(ws, row, col("Q"), nonzero(sum_pop(bds, Population::Graduates)), &fmt)?;
    write_count(ws, row, col("R"), a.professors_count.and_then(nonzero), &fmt)?;
    write_count(ws, row, col("S"), a.administrative_count.and_then(nonzero), &fmt)?;
    write_count(ws, row, col("T"), a.external_people_count.and_then(nonzero), &fmt)?;
    write_count(ws, row, col("U"), a.total_beneficiaries.and_then(nonzero), &fmt)?;

    for (letter, program, level) in CUCUTA_STUDENT_COLS {
        let v = bd_get(bds, Population::Students, "CÚCUTA", program, *level);
        write_count(ws, row, col(letter), v, &fmt)?;
    }
    for (letter, program, level) in OCANA_STUDENT_COLS {
        let v = bd_get(bds, Population::Students, "OCAÑA", program, *level);
        write_count(ws, row, col(letter), v, &fmt)?;
    }
    for (letter, program) in GRADUATE_CUCUTA_COLS {
        let v = bd_get_any_level(bds, Population::Graduates, "CÚCUTA", program);
        write_count(ws, row, col(letter), v, &fmt)?;
    }
    for (letter, program) in GRADUATE_OCANA_COLS {
        let v = bd_get_any_level(bds, Population::Graduates, "OCAÑA", program);
        write_count(ws, row, col(letter), v, &fmt)?;
    }
    for (letter, program) in PROFESSOR_COLS {
        let v = bd_get_any_level(bds, Population::Professor, "N/A", program);
        write_count(ws, row, col(letter), v, &fmt)?;
    }

    // The template repeats the administrative / external totals in the
    // classification block.
    write_count(ws, row, col("BP"), a.administrative_count.and_then(nonzero), &fmt)?;
    write_count(ws, row, col("BQ"), a.external_people_count.and_then(nonzero), &fmt)?;

    write_opt_text(ws, row, col("BR"), a.speaker_full_name.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("BS"), a.speaker_origin.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("BT"), a.speaker_company.as_deref(), &fmt)?;

    write_opt_text(ws, row, col("BU"), a.consultancy_entity_name.as_deref(), &fmt)?;
    write_opt_text(ws, row, col("BV"), a.consultancy_sector_id.as_deref(), &fmt)?;
    match &a.consultancy_value {
        Some(v) => write_text(ws, row, col("BW"), &v.to_string(), &fmt)?,
        None => write_text(ws, row, col("BW"), "", &fmt)?,
    }

    write_text(ws, row, col("BX"), yes_no(a.evidence_event_planning), &fmt)?;
    write_text(ws, row, col("BY"), yes_no(a.evidence_attendance_control), &fmt)?;
    write_text(ws, row, col("BZ"), yes_no(a.evidence_program_design_guide), &fmt)?;
    write_text(ws, row, col("CA"), yes_no(a.evidence_audiovisual_record), &fmt)?;

    Ok(())
}

/// Render the given activities into a template-shaped workbook.
pub fn export_workbook(
    rows: &[(SoftwareActivity, Vec<BeneficiaryBreakdown>)],
) -> Result<ExportResult> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();

    write_header_block(ws)?;
    for (i, (activity, breakdowns)) in rows.iter().enumerate() {
        write_data_row(ws, DATA_START_ROW + i as u32, activity, breakdowns)?;
    }

    let data = workbook.save_to_buffer()?;
    Ok(ExportResult {
        filename: EXPORT_FILENAME,
        content_type: XLSX_CONTENT_TYPE,
        data,
    })
}
