//! Header detection for imported workbooks
//!
//! The template carries a three-row multi-level header (groups, columns,
//! sub-columns) with merged cells. Merges only materialize their top-left
//! value, so group rows get forward-filled before columns are labelled
//! with the concatenation of their header parts.

use calamine::{Data, Range};

use crate::domain::{EducationLevel, Population};
use crate::excel::normalize::{norm, title_case};
use crate::excel::serial::cell_string;

/// How far down the header row is searched before giving up.
const HEADER_SCAN_ROWS: u32 = 14;

/// Find the 0-based row holding the main headers, recognized by AÑO and
/// SEMESTRE appearing together (accent-insensitive).
pub fn detect_header_row(range: &Range<Data>) -> Option<u32> {
    let (last_row, last_col) = range.end()?;
    for r in 0..=last_row.min(HEADER_SCAN_ROWS - 1) {
        let mut joined = String::new();
        for c in 0..=last_col {
            joined.push_str(&cell_string(range.get_value((r, c))));
            joined.push(' ');
        }
        let joined = norm(&joined);
        if joined.contains("ANO") && joined.contains("SEMESTRE") {
            return Some(r);
        }
    }
    None
}

/// Forward-fill empty cells from the last non-empty one to the left.
/// Undoes merged group headers where only the first cell carries text.
pub fn forward_fill(values: &mut [String]) {
    let mut last = String::new();
    for v in values.iter_mut() {
        if v.is_empty() {
            v.clone_from(&last);
        } else {
            last.clone_from(v);
        }
    }
}

/// Build one composite header per column by concatenating the given
/// header rows top to bottom, deduplicating repeated parts.
///
/// Only the rows listed in `ffill_rows` are forward-filled: the level
/// row must keep its gaps, they are what separates the blocks.
pub fn composite_headers(
    range: &Range<Data>,
    header_rows: &[u32],
    ffill_rows: &[u32],
) -> Vec<String> {
    let Some((_, last_col)) = range.end() else {
        return Vec::new();
    };
    let n_cols = last_col as usize + 1;

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(header_rows.len());
    for &r in header_rows {
        let mut vals: Vec<String> = (0..n_cols)
            .map(|c| {
                cell_string(range.get_value((r, c as u32)))
                    .replace('\n', " ")
                    .trim()
                    .to_string()
            })
            .collect();
        if ffill_rows.contains(&r) {
            forward_fill(&mut vals);
        }
        rows.push(vals);
    }

    (0..n_cols)
        .map(|c| {
            let mut parts: Vec<&str> = Vec::new();
            for row in &rows {
                let p = row[c].trim();
                if !p.is_empty() && !parts.contains(&p) {
                    parts.push(p);
                }
            }
            parts.join(" ")
        })
        .collect()
}

/// Classification parsed out of a composite column header.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownKey {
    pub population: Population,
    pub campus: String,
    pub program: String,
    pub level: EducationLevel,
}

/// Recognize a beneficiary-classification column from its composite
/// header, e.g. "ESTUDIANTES CÚCUTA Programa X Tecnico".
///
/// Returns `None` for anything that is not a classification column,
/// including the "3 PROFESOR" total inside the TIPO DE BENEFICIARIO
/// block, which would otherwise look like a professor column.
pub fn parse_breakdown_header(header: &str) -> Option<BreakdownKey> {
    let h = norm(header);

    let population = if h.contains("ESTUDIANTES") {
        Population::Students
    } else if h.contains("GRADUADOS") {
        Population::Graduates
    } else if h.contains("PROFESOR") && !h.contains("TIPO DE BENEFICIARIO") {
        Population::Professor
    } else {
        return None;
    };

    let campus = match population {
        Population::Students | Population::Graduates => {
            if h.contains("CUCUTA") {
                "CÚCUTA".to_string()
            } else if h.contains("OCANA") {
                "OCAÑA".to_string()
            } else {
                return None;
            }
        }
        Population::Professor => "N/A".to_string(),
    };

    let level = if h.contains("TECNICO") {
        EducationLevel::Tecnico
    } else if h.contains("TECNOLOGO") {
        EducationLevel::Tecnologo
    } else if h.contains("PROFESIONAL") {
        EducationLevel::Profesional
    } else if matches!(population, Population::Graduates | Population::Professor) {
        // Graduate and professor columns carry no level in the template.
        EducationLevel::Total
    } else {
        return None;
    };

    // The program name is whatever survives after the known tokens.
    // `norm` already removed accents, so the plain spellings suffice.
    let mut program = h;
    for token in [
        "TIPO DE BENEFICIARIO",
        "ESTUDIANTES",
        "GRADUADOS",
        "PROFESOR",
        "CUCUTA",
        "OCANA",
        "TECNICO",
        "TECNOLOGO",
        "PROFESIONAL",
        "PROGRAMA",
    ] {
        program = program.replace(token, " ");
    }
    let mut program = title_case(&norm(&program).to_lowercase());
    if program.is_empty() {
        program = "Sin especificar".to_string();
    }

    Some(BreakdownKey { population, campus, program, level })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_fill_carries_last_value() {
        let mut v: Vec<String> = ["A", "", "", "B", ""].iter().map(|s| s.to_string()).collect();
        forward_fill(&mut v);
        assert_eq!(v, ["A", "A", "A", "B", "B"]);
    }

    #[test]
    fn test_parse_student_column() {
        let key =
            parse_breakdown_header("ESTUDIANTES CÚCUTA Programa Admón Financiera Tecnico").unwrap();
        assert_eq!(key.population, Population::Students);
        assert_eq!(key.campus, "CÚCUTA");
        assert_eq!(key.program, "Admon Financiera");
        assert_eq!(key.level, EducationLevel::Tecnico);
    }

    #[test]
    fn test_parse_graduate_column_defaults_to_total_level() {
        let key = parse_breakdown_header("GRADUADOS OCAÑA Diseño Grafico").unwrap();
        assert_eq!(key.population, Population::Graduates);
        assert_eq!(key.campus, "OCAÑA");
        assert_eq!(key.program, "Diseno Grafico");
        assert_eq!(key.level, EducationLevel::Total);
    }

    #[test]
    fn test_parse_professor_column_has_na_campus() {
        let key = parse_breakdown_header("PROFESOR Programa Ing. Software").unwrap();
        assert_eq!(key.population, Population::Professor);
        assert_eq!(key.campus, "N/A");
        assert_eq!(key.level, EducationLevel::Total);
    }

    #[test]
    fn test_beneficiary_type_professor_total_is_not_a_breakdown() {
        assert!(parse_breakdown_header("TIPO DE BENEFICIARIO 3 PROFESOR").is_none());
    }

    #[test]
    fn test_student_column_without_campus_or_level_is_rejected() {
        assert!(parse_breakdown_header("ESTUDIANTES Programa X Tecnico").is_none());
        assert!(parse_breakdown_header("ESTUDIANTES CÚCUTA Programa X").is_none());
    }

    #[test]
    fn test_residual_program_name_falls_back_to_placeholder() {
        let key = parse_breakdown_header("ESTUDIANTES CUCUTA PROGRAMA TECNICO").unwrap();
        assert_eq!(key.program, "Sin especificar");
    }
}
