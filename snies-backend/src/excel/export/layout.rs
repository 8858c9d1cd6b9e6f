//! Fixed layout of the SNIES "Software" template
//!
//! Everything here mirrors the official workbook cell by cell: merge
//! ranges, header labels, row heights, column widths, and the program
//! columns of the beneficiary classification block. Kept as data so the
//! 79-column layout stays auditable independently of the styling code.

use std::collections::HashMap;

use crate::domain::EducationLevel;

pub const SHEET_NAME: &str = "Software";
pub const TITLE: &str = "PLANILLA REPORTE SNIES";

/// Last column of the template, CA (0-based).
pub const LAST_COL: u16 = 78;
/// First row of the header block, template row 3.
pub const HEADER_FIRST_ROW: u32 = 2;
/// Last row of the header block, template row 6.
pub const HEADER_LAST_ROW: u32 = 5;
/// First data row, template row 7.
pub const DATA_START_ROW: u32 = 6;

/// Parse a column reference like "A", "AS" or "CA" into a 0-based index.
pub fn col(letters: &str) -> u16 {
    letters
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + (b - b'A' + 1) as u32) as u16
        - 1
}

/// Parse an A1-style cell reference into (row, col), both 0-based.
pub fn cell_ref(addr: &str) -> (u32, u16) {
    let split = addr
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(addr.len());
    let (letters, digits) = addr.split_at(split);
    let row: u32 = digits.parse().expect("cell reference without row number");
    (row - 1, col(letters))
}

/// Parse an A1-style range like "V3:BQ3" into (first, last) cells.
pub fn range_ref(range: &str) -> ((u32, u16), (u32, u16)) {
    let (first, last) = range
        .split_once(':')
        .expect("range reference without a colon");
    (cell_ref(first), cell_ref(last))
}

/// Merge ranges of the header block, copied from the official template.
/// Applied after all per-cell styling so no border is written halfway.
pub const HEADER_MERGES: &[&str] = &[
    "A1:CA1",
    "A5:A6",
    "B5:B6",
    "C5:C6",
    "D5:D6",
    "E5:E6",
    "F5:F6",
    "G5:G6",
    "H5:H6",
    "I5:I6",
    "P4:U4",
    "P5:P6",
    "Q5:Q6",
    "R5:R6",
    "S5:S6",
    "T5:T6",
    "U5:U6",
    "V3:BQ3",
    "V4:AR4",
    "AS4:AX4",
    "AY4:BE4",
    "BF4:BH4",
    "BI4:BO4",
    "BP4:BP6",
    "BQ4:BQ6",
    "BR3:BT4",
    "BR5:BR6",
    "BS5:BS6",
    "BT5:BT6",
    "BU3:BW4",
    "BU5:BU6",
    "BV5:BV6",
    "BW5:BW6",
    "BX3:CA4",
    "BX5:BX6",
    "BY5:BY6",
    "BZ5:BZ6",
    "CA5:CA6",
    "V5:X5",
    "Y5:Z5",
    "AA5:AC5",
    "AD5:AF5",
    "AG5:AI5",
    "AJ5:AL5",
    "AM5:AO5",
    "AP5:AR5",
    "AS5:AT5",
    "AU5:AV5",
    "AW5:AX5",
    "AY5:AY6",
    "AZ5:AZ6",
    "BA5:BA6",
    "BB5:BB6",
    "BC5:BC6",
    "BD5:BD6",
    "BE5:BE6",
    "BF5:BF6",
    "BG5:BG6",
    "BH5:BH6",
    "BI5:BI6",
    "BJ5:BJ6",
    "BK5:BK6",
    "BL5:BL6",
    "BM5:BM6",
    "BN5:BN6",
    "BO5:BO6",
];

/// Row-3 banners over the classification / speaker / consultancy / evidence blocks.
pub const BANNER_LABELS: &[(&str, &str)] = &[
    ("V3", "CLASIFICACIÓN DE POBLACIÓN BENEFICIADA"),
    (
        "BR3",
        "SI LA ACTIVIDAD ES FORMACIÓN CONTINUA, INDIQUE DATOS DEL CONFERENCISTA / PONENTE",
    ),
    ("BU3", "SI LA ACTIVIDAD ES UNA CONSULTORIA DILIGENCIE:"),
    ("BX3", "EVIDENCIAS DE LA ACTIVIDAD"),
];

/// Row-4 group headers.
pub const GROUP_LABELS: &[(&str, &str)] = &[
    ("P4", "TIPO DE BENEFICIARIO"),
    ("V4", "ESTUDIANTES CÚCUTA"),
    ("AS4", "ESTUDIANTES OCAÑA"),
    ("AY4", "GRADUADOS CÚCUTA"),
    ("BF4", "GRADUADOS OCAÑA"),
    ("BI4", "PROFESOR"),
    ("BP4", "ADMINISTRATIVO"),
    ("BQ4", "PERSONA NO VINCULADA"),
];

/// Row-5 headers: base fields, beneficiary-type totals, program names,
/// speaker/consultancy/evidence columns. Spelling quirks ("ACTIVDAD",
/// "BENEFICIAIROS", "Logitica") are part of the template contract.
pub const ROW5_LABELS: &[(&str, &str)] = &[
    ("A5", "AÑO"),
    ("B5", "SEMESTRE"),
    ("C5", "FECHA INICIO DE LA ACTIVIDAD"),
    ("D5", "FECHA FIN DE LA ACTIVIDAD"),
    ("E5", "LUGAR DE EJECUCION DE LA ACTIVIDAD"),
    ("F5", "SEDE: CÚCUTA / OCAÑA"),
    ("G5", "NOMBRE_DE LA ACTIVDAD"),
    (
        "H5",
        "LA ACTIVIDAD SE DESARROLLO EN MARCO DE UN CONVENIO-  DETALLE EL NOMBRE DE LA ENTIDAD",
    ),
    ("I5", "DESCRIPCIÓN"),
    (
        "J5",
        "CLASIFICACIÓN INTERNACIONAL NORMALIZADA DE LA EDUCACIÓN DE SUPERIOR",
    ),
    ("P5", "1. ESTUDIANTE"),
    ("Q5", "2. GRADUADO"),
    ("R5", "3 PROFESOR"),
    ("S5", "4 ADMINISTRATIVO IES"),
    ("T5", "5PERSONA NO VINCULADA"),
    ("U5", "TOTAL BENEFICIAIROS"),
    ("V5", "Programa Admón Financiera"),
    ("Y5", "Programa Logitica Empresarial"),
    ("AA5", "Programa Admón Turistica y Hotelera"),
    ("AD5", "Programa Ing. Software"),
    ("AG5", "Programa Admón Negocios Internacionales (PRESENCIAL)"),
    ("AJ5", "Programa Admón Negocios Internacionales (DISTANCIA)"),
    ("AM5", "Diseño Grafico"),
    ("AP5", "Diseño y Admón de la moda"),
    ("AS5", "Programa Admón Financiera"),
    ("AU5", "Programa Admón Negocios Internacionales (PRESENCIAL)"),
    ("AW5", "Diseño Grafico"),
    ("AY5", "Programa Admón Financiera"),
    ("AZ5", "Programa Logitica Empresarial"),
    ("BA5", "Programa Admón Turistica y Hotelera"),
    ("BB5", "Programa Ing. Software"),
    ("BC5", "Programa Admón Negocios Internacionales"),
    ("BD5", "Diseño Grafico"),
    ("BE5", "Diseño y Admón de la moda"),
    ("BF5", "Programa Admón Financiera"),
    ("BG5", "Programa Admón Negocios Internacionales"),
    ("BH5", "Diseño Grafico"),
    ("BI5", "Programa Admón Financiera"),
    ("BJ5", "Programa Logitica Empresarial"),
    ("BK5", "Programa Admón Turistica y Hotelera"),
    ("BL5", "Programa Ing. Software"),
    ("BM5", "Programa Admón Negocios Internacionales"),
    ("BN5", "Diseño Grafico"),
    ("BO5", "Diseño y Admón de la moda"),
    ("BR5", "NOMBRES Y APELLIDOS"),
    ("BS5", "PROCEDENCIA"),
    ("BT5", "EMPRESA QUE REPRESENTA"),
    ("BU5", "NOMBRE_ENTIDAD"),
    ("BV5", "ID_SECTOR_CONSULTORIA"),
    ("BW5", "VALOR"),
    ("BX5", "FORMATO PLANEACIÓN DE EVENTOS"),
    ("BY5", "CONTROL ASISTENCIA ACTIVIDADES ACADEMICAS EXTRACURRICULARES"),
    (
        "BZ5",
        "FORMATO GUÍA PARA EL DISEÑO DE PROGRAMAS DE EDUCACIÓN      CONTINUADA (Diplomados)",
    ),
    ("CA5", "REGISTRO AUDIOVISUAL"),
];

/// Row-6 sub-headers: CINE/logistics field codes and the per-program
/// education-level triplets (pairs for Ocaña).
pub const ROW6_LABELS: &[(&str, &str)] = &[
    ("J6", "|ID_CINE_CAMPO_DETALLADO"),
    ("K6", "NUM_HORAS"),
    ("L6", "ID_TIPO_ ACTIVIDAD"),
    ("M6", "VALOR_CURSO (COSTO POR PERSONA DEL EVENTO- INSCRIPCIÓN )"),
    ("N6", "ID_TIPO_DOCUMENTO DOCENTE QUE IMPARTIO  EL CURSO"),
    ("O6", "NUM_DOCUMENTO DOCENTE QUE IMPARTIO EL CURSO"),
    ("V6", "Tecnico"),
    ("W6", "Tecnologo"),
    ("X6", "Profesional"),
    ("Y6", "Tecnico"),
    ("Z6", "Tecnologo"),
    ("AA6", "Tecnico"),
    ("AB6", "Tecnologo"),
    ("AC6", "Profesional"),
    ("AD6", "Tecnico"),
    ("AE6", "Tecnologo"),
    ("AF6", "Profesional"),
    ("AG6", "Tecnico"),
    ("AH6", "Tecnologo"),
    ("AI6", "Profesional"),
    ("AJ6", "Tecnico"),
    ("AK6", "Tecnologo"),
    ("AL6", "Profesional"),
    ("AM6", "Tecnico"),
    ("AN6", "Tecnologo"),
    ("AO6", "Profesional"),
    ("AP6", "Tecnico"),
    ("AQ6", "Tecnologo"),
    ("AR6", "Profesional"),
    ("AS6", "Tecnologo"),
    ("AT6", "Profesional"),
    ("AU6", "Tecnologo"),
    ("AV6", "Profesional"),
    ("AW6", "Tecnologo"),
    ("AX6", "Profesional"),
];

/// Fixed row heights of the template (0-based row, points).
pub const ROW_HEIGHTS: &[(u32, f64)] = &[
    (0, 34.5),
    (1, 16.5),
    (2, 16.5),
    (3, 37.5),
    (4, 60.75),
    (5, 130.5),
    (6, 15.0),
];

/// Column widths the template defines explicitly; the rest keep defaults.
pub const COL_WIDTHS: &[(&str, f64)] = &[
    ("A", 12.42578125),
    ("B", 15.140625),
    ("C", 18.85546875),
    ("E", 60.0),
    ("F", 18.5703125),
    ("G", 50.42578125),
    ("H", 28.85546875),
    ("J", 55.28515625),
    ("K", 19.42578125),
    ("L", 26.85546875),
    ("M", 21.42578125),
    ("N", 30.5703125),
    ("O", 24.7109375),
    ("P", 5.42578125),
    ("U", 8.42578125),
    ("V", 4.7109375),
    ("Y", 7.5703125),
    ("Z", 7.28515625),
    ("AA", 4.28515625),
    ("AD", 4.5703125),
    ("AG", 6.42578125),
    ("AU", 8.42578125),
    ("AV", 9.85546875),
    ("AW", 6.42578125),
];

/// Cúcuta student block V..AR: program × level, up to three levels each.
pub const CUCUTA_STUDENT_COLS: &[(&str, &str, EducationLevel)] = &[
    ("V", "Programa Admón Financiera", EducationLevel::Tecnico),
    ("W", "Programa Admón Financiera", EducationLevel::Tecnologo),
    ("X", "Programa Admón Financiera", EducationLevel::Profesional),
    ("Y", "Programa Logitica Empresarial", EducationLevel::Tecnico),
    ("Z", "Programa Logitica Empresarial", EducationLevel::Tecnologo),
    ("AA", "Programa Admón Turistica y Hotelera", EducationLevel::Tecnico),
    ("AB", "Programa Admón Turistica y Hotelera", EducationLevel::Tecnologo),
    ("AC", "Programa Admón Turistica y Hotelera", EducationLevel::Profesional),
    ("AD", "Programa Ing. Software", EducationLevel::Tecnico),
    ("AE", "Programa Ing. Software", EducationLevel::Tecnologo),
    ("AF", "Programa Ing. Software", EducationLevel::Profesional),
    ("AG", "Programa Admón Negocios Internacionales (PRESENCIAL)", EducationLevel::Tecnico),
    ("AH", "Programa Admón Negocios Internacionales (PRESENCIAL)", EducationLevel::Tecnologo),
    ("AI", "Programa Admón Negocios Internacionales (PRESENCIAL)", EducationLevel::Profesional),
    ("AJ", "Programa Admón Negocios Internacionales (DISTANCIA)", EducationLevel::Tecnico),
    ("AK", "Programa Admón Negocios Internacionales (DISTANCIA)", EducationLevel::Tecnologo),
    ("AL", "Programa Admón Negocios Internacionales (DISTANCIA)", EducationLevel::Profesional),
    ("AM", "Diseño Grafico", EducationLevel::Tecnico),
    ("AN", "Diseño Grafico", EducationLevel::Tecnologo),
    ("AO", "Diseño Grafico", EducationLevel::Profesional),
    ("AP", "Diseño y Admón de la moda", EducationLevel::Tecnico),
    ("AQ", "Diseño y Admón de la moda", EducationLevel::Tecnologo),
    ("AR", "Diseño y Admón de la moda", EducationLevel::Profesional),
];

/// Ocaña student block AS..AX: no técnico column exists for this campus.
pub const OCANA_STUDENT_COLS: &[(&str, &str, EducationLevel)] = &[
    ("AS", "Programa Admón Financiera", EducationLevel::Tecnologo),
    ("AT", "Programa Admón Financiera", EducationLevel::Profesional),
    ("AU", "Programa Admón Negocios Internacionales (PRESENCIAL)", EducationLevel::Tecnologo),
    ("AV", "Programa Admón Negocios Internacionales (PRESENCIAL)", EducationLevel::Profesional),
    ("AW", "Diseño Grafico", EducationLevel::Tecnologo),
    ("AX", "Diseño Grafico", EducationLevel::Profesional),
];

/// Graduate totals per program, Cúcuta (AY..BE); no level granularity.
pub const GRADUATE_CUCUTA_COLS: &[(&str, &str)] = &[
    ("AY", "Programa Admón Financiera"),
    ("AZ", "Programa Logitica Empresarial"),
    ("BA", "Programa Admón Turistica y Hotelera"),
    ("BB", "Programa Ing. Software"),
    ("BC", "Programa Admón Negocios Internacionales"),
    ("BD", "Diseño Grafico"),
    ("BE", "Diseño y Admón de la moda"),
];

/// Graduate totals per program, Ocaña (BF..BH).
pub const GRADUATE_OCANA_COLS: &[(&str, &str)] = &[
    ("BF", "Programa Admón Financiera"),
    ("BG", "Programa Admón Negocios Internacionales"),
    ("BH", "Diseño Grafico"),
];

/// Professor totals per program (BI..BO); campus is the "N/A" sentinel.
pub const PROFESSOR_COLS: &[(&str, &str)] = &[
    ("BI", "Programa Admón Financiera"),
    ("BJ", "Programa Logitica Empresarial"),
    ("BK", "Programa Admón Turistica y Hotelera"),
    ("BL", "Programa Ing. Software"),
    ("BM", "Programa Admón Negocios Internacionales"),
    ("BN", "Diseño Grafico"),
    ("BO", "Diseño y Admón de la moda"),
];

/// All header labels keyed by (row, col), 0-based.
pub fn header_labels() -> HashMap<(u32, u16), &'static str> {
    let mut labels = HashMap::new();
    for table in [BANNER_LABELS, GROUP_LABELS, ROW5_LABELS, ROW6_LABELS] {
        for (addr, text) in table {
            labels.insert(cell_ref(addr), *text);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_parses_single_and_double_letters() {
        assert_eq!(col("A"), 0);
        assert_eq!(col("Z"), 25);
        assert_eq!(col("AA"), 26);
        assert_eq!(col("AR"), 43);
        assert_eq!(col("CA"), 78);
        assert_eq!(col("CA"), LAST_COL);
    }

    #[test]
    fn test_cell_and_range_refs_are_zero_based() {
        assert_eq!(cell_ref("A5"), (4, 0));
        assert_eq!(cell_ref("BQ4"), (3, col("BQ")));
        assert_eq!(range_ref("V3:BQ3"), ((2, col("V")), (2, col("BQ"))));
    }

    #[test]
    fn test_all_merges_parse_and_stay_in_bounds() {
        for m in HEADER_MERGES {
            let ((r1, c1), (r2, c2)) = range_ref(m);
            assert!(r1 <= r2 && c1 <= c2, "inverted range {m}");
            assert!(c2 <= LAST_COL, "range {m} beyond CA");
            assert!(r2 <= HEADER_LAST_ROW, "range {m} into data rows");
        }
    }

    #[test]
    fn test_header_labels_cover_the_known_anchors() {
        let labels = header_labels();
        assert_eq!(labels.get(&cell_ref("A5")), Some(&"AÑO"));
        assert_eq!(labels.get(&cell_ref("B5")), Some(&"SEMESTRE"));
        assert_eq!(labels.get(&cell_ref("V6")), Some(&"Tecnico"));
        assert_eq!(labels.get(&cell_ref("CA5")), Some(&"REGISTRO AUDIOVISUAL"));
        assert_eq!(
            labels.len(),
            BANNER_LABELS.len() + GROUP_LABELS.len() + ROW5_LABELS.len() + ROW6_LABELS.len(),
        );
    }

    #[test]
    fn test_classification_blocks_have_the_template_shape() {
        assert_eq!(CUCUTA_STUDENT_COLS.len(), 23);
        assert_eq!(OCANA_STUDENT_COLS.len(), 6);
        assert_eq!(GRADUATE_CUCUTA_COLS.len(), 7);
        assert_eq!(GRADUATE_OCANA_COLS.len(), 3);
        assert_eq!(PROFESSOR_COLS.len(), 7);
        assert!(
            OCANA_STUDENT_COLS
                .iter()
                .all(|(_, _, level)| *level != EducationLevel::Tecnico),
        );
    }
}
