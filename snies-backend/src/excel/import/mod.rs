//! Workbook reader for the SNIES "Software" template
//!
//! Accepts the official template and reasonable near-misses of it: the
//! header row is located by content, columns are resolved by normalized
//! name with template positions as a fallback, and the classification
//! block is recovered from the composite headers rather than hard-coded
//! column letters.

pub mod headers;

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use log::warn;

use crate::domain::{BeneficiaryBreakdown, SoftwareActivity};
use crate::excel::normalize::norm;
use crate::excel::serial::{cell_date, cell_decimal, cell_int, cell_opt_string, cell_string};
use headers::{composite_headers, detect_header_row, parse_breakdown_header, BreakdownKey};

/// Everything parsed out of an uploaded workbook, not yet persisted.
/// Breakdowns are keyed by the index of their activity in `activities`.
pub struct ParsedImport {
    pub activities: Vec<SoftwareActivity>,
    pub breakdowns_by_index: HashMap<usize, Vec<BeneficiaryBreakdown>>,
    pub skipped_empty_rows: usize,
}

/// Column index for a header name: exact normalized match first, then
/// the first header containing the name as a substring. Header order is
/// column order, so ambiguous names resolve to the leftmost column.
fn resolve(header_map: &[(String, usize)], name: &str) -> Option<usize> {
    let n = norm(name);
    if let Some((_, idx)) = header_map.iter().find(|(h, _)| norm(h) == n) {
        return Some(*idx);
    }
    header_map
        .iter()
        .find(|(h, _)| norm(h).contains(&n))
        .map(|(_, idx)| *idx)
}

/// Resolve a base column, falling back to its fixed template position.
fn resolve_or(
    header_map: &[(String, usize)],
    name: &str,
    fallback: usize,
    fell_back: &mut Vec<&'static str>,
    tag: &'static str,
) -> usize {
    match resolve(header_map, name) {
        Some(idx) => idx,
        None => {
            fell_back.push(tag);
            fallback
        }
    }
}

struct Columns {
    year: usize,
    semester: usize,
    start_date: usize,
    end_date: usize,
    place: usize,
    campus: usize,
    name: usize,
    agreement: usize,
    description: usize,
    cine_name: usize,
    cine_id: usize,
    hours: usize,
    activity_type: usize,
    course_value: usize,
    teacher_doc_type: usize,
    teacher_doc_num: usize,
    total_beneficiaries: usize,
    professors: usize,
    administrative: usize,
    external: usize,
    speaker_name: Option<usize>,
    speaker_origin: Option<usize>,
    speaker_company: Option<usize>,
    consultancy_entity: Option<usize>,
    consultancy_sector: Option<usize>,
    consultancy_value: Option<usize>,
    evidence_planning: Option<usize>,
    evidence_attendance: Option<usize>,
    evidence_program_guide: Option<usize>,
    evidence_audiovisual: Option<usize>,
}

fn resolve_columns(header_map: &[(String, usize)]) -> Columns {
    let mut fb = Vec::new();
    let name = resolve(header_map, "NOMBRE_DE LA ACTIVIDAD")
        // The official template misspells the header.
        .or_else(|| resolve(header_map, "NOMBRE_DE LA ACTIVDAD"))
        .unwrap_or_else(|| {
            fb.push("activity_name");
            6
        });
    let columns = Columns {
        year: resolve_or(header_map, "AÑO", 0, &mut fb, "year"),
        semester: resolve_or(header_map, "SEMESTRE", 1, &mut fb, "semester"),
        start_date: resolve_or(header_map, "FECHA INICIO DE LA ACTIVIDAD", 2, &mut fb, "start_date"),
        end_date: resolve_or(header_map, "FECHA FIN DE LA ACTIVIDAD", 3, &mut fb, "end_date"),
        place: resolve_or(header_map, "LUGAR DE EJECUCION DE LA ACTIVIDAD", 4, &mut fb, "place"),
        campus: resolve_or(header_map, "SEDE: CÚCUTA / OCAÑA", 5, &mut fb, "campus"),
        name,
        agreement: resolve_or(
            header_map,
            "LA ACTIVIDAD SE DESARROLLO EN MARCO DE UN CONVENIO-  DETALLE EL NOMBRE DE LA ENTIDAD",
            7,
            &mut fb,
            "agreement",
        ),
        description: resolve_or(header_map, "DESCRIPCIÓN", 8, &mut fb, "description"),
        cine_name: resolve_or(
            header_map,
            "CLASIFICACIÓN INTERNACIONAL NORMALIZADA DE LA EDUCACIÓN DE SUPERIOR",
            9,
            &mut fb,
            "cine_name",
        ),
        // The template keeps the CINE id in the same column J as the
        // name, e.g. "613  Desarrollo y análisis de software".
        cine_id: resolve_or(header_map, "|ID_CINE_CAMPO_DETALLADO", 9, &mut fb, "cine_id"),
        hours: resolve_or(header_map, "NUM_HORAS", 10, &mut fb, "hours"),
        activity_type: resolve_or(header_map, "ID_TIPO_ ACTIVIDAD", 11, &mut fb, "activity_type"),
        course_value: resolve_or(
            header_map,
            "VALOR_CURSO (COSTO POR PERSONA DEL EVENTO- INSCRIPCIÓN )",
            12,
            &mut fb,
            "course_value",
        ),
        teacher_doc_type: resolve_or(
            header_map,
            "ID_TIPO_DOCUMENTO DOCENTE QUE IMPARTIO  EL CURSO",
            13,
            &mut fb,
            "teacher_doc_type",
        ),
        teacher_doc_num: resolve_or(
            header_map,
            "NUM_DOCUMENTO DOCENTE QUE IMPARTIO EL CURSO",
            14,
            &mut fb,
            "teacher_doc_num",
        ),
        total_beneficiaries: resolve_or(header_map, "TOTAL BENEFICIAIROS", 20, &mut fb, "total_beneficiaries"),
        professors: resolve_or(header_map, "3 PROFESOR", 17, &mut fb, "professors"),
        administrative: resolve_or(header_map, "4 ADMINISTRATIVO IES", 18, &mut fb, "administrative"),
        external: resolve_or(header_map, "5PERSONA NO VINCULADA", 19, &mut fb, "external"),
        speaker_name: resolve(header_map, "NOMBRES Y APELLIDOS"),
        speaker_origin: resolve(header_map, "PROCEDENCIA"),
        speaker_company: resolve(header_map, "EMPRESA QUE REPRESENTA"),
        consultancy_entity: resolve(header_map, "NOMBRE_ENTIDAD"),
        consultancy_sector: resolve(header_map, "ID_SECTOR_CONSULTORIA"),
        consultancy_value: resolve(header_map, "VALOR"),
        evidence_planning: resolve(header_map, "FORMATO PLANEACIÓN DE EVENTOS"),
        evidence_attendance: resolve(
            header_map,
            "CONTROL ASISTENCIA ACTIVIDADES ACADEMICAS EXTRACURRICULARES",
        ),
        evidence_program_guide: resolve(
            header_map,
            "FORMATO GUÍA PARA EL DISEÑO DE PROGRAMAS DE EDUCACIÓN CONTINUADA (Diplomados)",
        ),
        evidence_audiovisual: resolve(header_map, "REGISTRO AUDIOVISUAL"),
    };
    if !fb.is_empty() {
        warn!("headers not found, using template positions for: {}", fb.join(", "));
    }
    columns
}

fn cell<'a>(range: &'a Range<Data>, row: u32, col: usize) -> Option<&'a Data> {
    range.get_value((row, col as u32))
}

fn opt_cell<'a>(range: &'a Range<Data>, row: u32, col: Option<usize>) -> Option<&'a Data> {
    col.and_then(|c| cell(range, row, c))
}

fn cell_yes(range: &Range<Data>, row: u32, col: Option<usize>) -> bool {
    cell_string(opt_cell(range, row, col)).trim().to_uppercase() == "SI"
}

fn parse_row(range: &Range<Data>, row: u32, cols: &Columns) -> Option<SoftwareActivity> {
    let year = cell_int(cell(range, row, cols.year));
    let semester = cell_int(cell(range, row, cols.semester));
    let activity_name = cell_string(cell(range, row, cols.name)).trim().to_string();

    // Empty row: no year, no semester, no name.
    if year.unwrap_or(0) == 0 && semester.unwrap_or(0) == 0 && activity_name.is_empty() {
        return None;
    }

    let campus = cell_string(cell(range, row, cols.campus)).trim().to_string();
    let campus = if campus.is_empty() { "CÚCUTA".to_string() } else { campus };

    let cine_name = cell_opt_string(cell(range, row, cols.cine_name));
    // When no dedicated id column exists, the leading numeric token of
    // the CINE name doubles as the detailed field id.
    let cine_id = cell_opt_string(cell(range, row, cols.cine_id)).or_else(|| {
        let first = cine_name.as_deref()?.split_whitespace().next()?;
        if first.chars().all(|ch| ch.is_ascii_digit()) {
            Some(first.to_string())
        } else {
            None
        }
    });

    Some(SoftwareActivity {
        id: None,
        career: None,
        year: year.unwrap_or(0),
        semester: semester.unwrap_or(0),
        start_date: cell_date(cell(range, row, cols.start_date)),
        end_date: cell_date(cell(range, row, cols.end_date)),
        execution_place: cell_string(cell(range, row, cols.place)).trim().to_string(),
        campus,
        activity_name,
        agreement_entity: cell_opt_string(cell(range, row, cols.agreement)),
        description: cell_opt_string(cell(range, row, cols.description)),
        cine_isced_name: cine_name,
        cine_field_detailed_id: cine_id,
        num_hours: cell_int(cell(range, row, cols.hours)),
        activity_type: cell_opt_string(cell(range, row, cols.activity_type)),
        course_value: cell_decimal(cell(range, row, cols.course_value)),
        teacher_document_type: cell_opt_string(cell(range, row, cols.teacher_doc_type)),
        teacher_document_number: cell_opt_string(cell(range, row, cols.teacher_doc_num)),
        total_beneficiaries: cell_int(cell(range, row, cols.total_beneficiaries)),
        professors_count: cell_int(cell(range, row, cols.professors)),
        administrative_count: cell_int(cell(range, row, cols.administrative)),
        external_people_count: cell_int(cell(range, row, cols.external)),
        speaker_full_name: cell_opt_string(opt_cell(range, row, cols.speaker_name)),
        speaker_origin: cell_opt_string(opt_cell(range, row, cols.speaker_origin)),
        speaker_company: cell_opt_string(opt_cell(range, row, cols.speaker_company)),
        consultancy_entity_name: cell_opt_string(opt_cell(range, row, cols.consultancy_entity)),
        consultancy_sector_id: cell_opt_string(opt_cell(range, row, cols.consultancy_sector)),
        consultancy_value: cell_decimal(opt_cell(range, row, cols.consultancy_value)),
        evidence_event_planning: cell_yes(range, row, cols.evidence_planning),
        evidence_attendance_control: cell_yes(range, row, cols.evidence_attendance),
        evidence_program_design_guide: cell_yes(range, row, cols.evidence_program_guide),
        evidence_audiovisual_record: cell_yes(range, row, cols.evidence_audiovisual),
    })
}

/// Parse an uploaded .xlsx into activities plus their classification
/// breakdowns. Prefers the "Software" sheet, falls back to the first one.
pub fn import_workbook(data: &[u8]) -> Result<ParsedImport> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data.to_vec())).context("failed to open workbook")?;

    let sheet_name = if workbook.sheet_names().iter().any(|n| n == "Software") {
        "Software".to_string()
    } else {
        workbook
            .sheet_names()
            .first()
            .cloned()
            .context("workbook has no sheets")?
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet {sheet_name}"))?;

    // Template row 5 when the anchor headers are missing entirely.
    let header_row = detect_header_row(&range).unwrap_or(4);
    let header_rows: Vec<u32> = [header_row.checked_sub(1), Some(header_row), Some(header_row + 1)]
        .into_iter()
        .flatten()
        .collect();
    let ffill_rows: Vec<u32> = header_rows
        .iter()
        .copied()
        .filter(|r| *r <= header_row)
        .collect();
    let composite = composite_headers(&range, &header_rows, &ffill_rows);

    // With a sub-header row below the main one, data starts a row later.
    let mut data_start = header_row + 1;
    if let Some((last_row, last_col)) = range.end() {
        if header_row + 1 <= last_row {
            let mut joined = String::new();
            for c in 0..=last_col {
                joined.push_str(&cell_string(range.get_value((header_row + 1, c))));
                joined.push(' ');
            }
            let joined = norm(&joined);
            if joined.contains("ID_CINE")
                || joined.contains("NUM_HORAS")
                || joined.contains("TECNOLOGO")
            {
                data_start = header_row + 2;
            }
        }
    }

    let header_map: Vec<(String, usize)> = composite
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty())
        .map(|(idx, h)| (h.trim().to_string(), idx))
        .collect();
    let cols = resolve_columns(&header_map);

    let breakdown_cols: Vec<(usize, BreakdownKey)> = composite
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| parse_breakdown_header(h).map(|key| (idx, key)))
        .collect();

    let mut parsed = ParsedImport {
        activities: Vec::new(),
        breakdowns_by_index: HashMap::new(),
        skipped_empty_rows: 0,
    };
    let Some((last_row, _)) = range.end() else {
        return Ok(parsed);
    };

    for row in data_start..=last_row {
        let Some(activity) = parse_row(&range, row, &cols) else {
            parsed.skipped_empty_rows += 1;
            continue;
        };
        let index = parsed.activities.len();
        parsed.activities.push(activity);

        let breakdowns: Vec<BeneficiaryBreakdown> = breakdown_cols
            .iter()
            .filter_map(|(c, key)| {
                let count = cell_int(cell(&range, row, *c))?;
                Some(BeneficiaryBreakdown {
                    id: None,
                    activity_id: None,
                    population: key.population,
                    campus: key.campus.clone(),
                    program: key.program.clone(),
                    level: key.level,
                    count,
                })
            })
            .collect();
        if !breakdowns.is_empty() {
            parsed.breakdowns_by_index.insert(index, breakdowns);
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EducationLevel, Population};
    use crate::excel::export::export_workbook;
    use rust_xlsxwriter::Workbook;

    fn parsed_roundtrip(
        rows: Vec<(SoftwareActivity, Vec<BeneficiaryBreakdown>)>,
    ) -> ParsedImport {
        let exported = export_workbook(&rows).unwrap();
        import_workbook(&exported.data).unwrap()
    }

    fn activity(year: i32, name: &str) -> SoftwareActivity {
        SoftwareActivity {
            year,
            semester: 2,
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 30),
            execution_place: "Sala de sistemas".into(),
            campus: "CÚCUTA".into(),
            activity_name: name.into(),
            description: Some("Curso corto".into()),
            num_hours: Some(40),
            total_beneficiaries: Some(12),
            evidence_attendance_control: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_roundtrip_preserves_base_fields() {
        let parsed = parsed_roundtrip(vec![(activity(2025, "Semillero TIC"), vec![])]);
        assert_eq!(parsed.activities.len(), 1);
        assert_eq!(parsed.skipped_empty_rows, 0);
        let a = &parsed.activities[0];
        assert_eq!(a.year, 2025);
        assert_eq!(a.semester, 2);
        assert_eq!(a.activity_name, "Semillero TIC");
        assert_eq!(a.start_date, chrono::NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(a.end_date, chrono::NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(a.num_hours, Some(40));
        assert_eq!(a.total_beneficiaries, Some(12));
        assert!(a.evidence_attendance_control);
        assert!(!a.evidence_event_planning);
    }

    #[test]
    fn test_roundtrip_recovers_breakdowns_from_headers() {
        let bds = vec![
            BeneficiaryBreakdown {
                id: None,
                activity_id: None,
                population: Population::Students,
                campus: "CÚCUTA".into(),
                program: "Programa Ing. Software".into(),
                level: EducationLevel::Profesional,
                count: 9,
            },
            BeneficiaryBreakdown {
                id: None,
                activity_id: None,
                population: Population::Professor,
                campus: "N/A".into(),
                program: "Diseño Grafico".into(),
                level: EducationLevel::Total,
                count: 2,
            },
        ];
        let parsed = parsed_roundtrip(vec![(activity(2024, "Taller UX"), bds)]);
        let got = &parsed.breakdowns_by_index[&0];
        let student = got
            .iter()
            .find(|b| b.population == Population::Students)
            .unwrap();
        assert_eq!(student.campus, "CÚCUTA");
        assert_eq!(student.program, "Ing. Software");
        assert_eq!(student.level, EducationLevel::Profesional);
        assert_eq!(student.count, 9);
        let prof = got
            .iter()
            .find(|b| b.population == Population::Professor)
            .unwrap();
        assert_eq!(prof.campus, "N/A");
        assert_eq!(prof.level, EducationLevel::Total);
        assert_eq!(prof.count, 2);
    }

    #[test]
    fn test_blank_rows_are_counted_not_imported() {
        // Header anchors present, then one real row at template position
        // and nothing else: rows of pure formatting must be skipped.
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(4, 0, "AÑO").unwrap();
        ws.write_string(4, 1, "SEMESTRE").unwrap();
        ws.write_string(4, 6, "NOMBRE_DE LA ACTIVDAD").unwrap();
        ws.write_number(5, 0, 2025.0).unwrap();
        ws.write_number(5, 1, 1.0).unwrap();
        ws.write_string(5, 6, "Feria de software").unwrap();
        ws.write_string(8, 4, "solo una nota suelta").unwrap();
        let data = wb.save_to_buffer().unwrap();

        let parsed = import_workbook(&data).unwrap();
        assert_eq!(parsed.activities.len(), 1);
        assert_eq!(parsed.activities[0].activity_name, "Feria de software");
        // Default campus when the column is empty.
        assert_eq!(parsed.activities[0].campus, "CÚCUTA");
        assert!(parsed.skipped_empty_rows >= 1);
    }

    #[test]
    fn test_missing_headers_fall_back_to_template_positions() {
        // No recognizable headers at all: anchor detection fails and the
        // reader assumes the fixed template geometry (data from row 7).
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_number(6, 0, 2023.0).unwrap();
        ws.write_number(6, 1, 2.0).unwrap();
        ws.write_string(6, 4, "Biblioteca").unwrap();
        ws.write_string(6, 6, "Capacitación docente").unwrap();
        ws.write_number(6, 10, 16.0).unwrap();
        let data = wb.save_to_buffer().unwrap();

        let parsed = import_workbook(&data).unwrap();
        assert_eq!(parsed.activities.len(), 1);
        let a = &parsed.activities[0];
        assert_eq!(a.year, 2023);
        assert_eq!(a.execution_place, "Biblioteca");
        assert_eq!(a.activity_name, "Capacitación docente");
        assert_eq!(a.num_hours, Some(16));
    }

    #[test]
    fn test_cine_id_recovered_from_leading_digits() {
        let mut a = activity(2025, "Bootcamp backend");
        a.cine_isced_name = Some("613  Desarrollo y análisis de software".into());
        a.cine_field_detailed_id = None;
        let parsed = parsed_roundtrip(vec![(a, vec![])]);
        let got = &parsed.activities[0];
        // Column J serves as both name and id in the template.
        assert_eq!(
            got.cine_isced_name.as_deref(),
            Some("613  Desarrollo y análisis de software"),
        );
        assert!(got.cine_field_detailed_id.is_some());
    }
}
