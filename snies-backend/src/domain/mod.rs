//! Domain entities for software extension activities
//!
//! These are immutable value objects: the importer builds them from
//! spreadsheet rows, the storage layer turns them into table rows.
//! Reporting data is often incomplete, so almost everything is optional.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which population a beneficiary breakdown counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Population {
    #[serde(rename = "students")]
    Students,
    #[serde(rename = "graduates")]
    Graduates,
    #[serde(rename = "professor")]
    Professor,
}

impl Population {
    pub fn as_str(&self) -> &'static str {
        match self {
            Population::Students => "students",
            Population::Graduates => "graduates",
            Population::Professor => "professor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "students" => Some(Population::Students),
            "graduates" => Some(Population::Graduates),
            "professor" => Some(Population::Professor),
            _ => None,
        }
    }
}

/// Education level of a beneficiary breakdown.
///
/// Graduate and professor blocks in the template report totals without a
/// per-level split; those import as [`EducationLevel::Total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "técnico")]
    Tecnico,
    #[serde(rename = "tecnólogo")]
    Tecnologo,
    #[serde(rename = "profesional")]
    Profesional,
    #[serde(rename = "total")]
    Total,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Tecnico => "técnico",
            EducationLevel::Tecnologo => "tecnólogo",
            EducationLevel::Profesional => "profesional",
            EducationLevel::Total => "total",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "técnico" | "tecnico" => Some(EducationLevel::Tecnico),
            "tecnólogo" | "tecnologo" => Some(EducationLevel::Tecnologo),
            "profesional" => Some(EducationLevel::Profesional),
            "total" => Some(EducationLevel::Total),
            _ => None,
        }
    }
}

/// One reporting record of the "Software" extension template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareActivity {
    pub id: Option<i64>,
    /// Program tag used for filtering in the UI; never sourced from the template.
    pub career: Option<String>,
    pub year: i32,
    pub semester: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub execution_place: String,
    pub campus: String,
    pub activity_name: String,
    pub agreement_entity: Option<String>,
    pub description: Option<String>,
    pub cine_isced_name: Option<String>,
    pub cine_field_detailed_id: Option<String>,
    pub num_hours: Option<i32>,
    pub activity_type: Option<String>,
    pub course_value: Option<Decimal>,
    pub teacher_document_type: Option<String>,
    pub teacher_document_number: Option<String>,
    pub total_beneficiaries: Option<i32>,
    pub professors_count: Option<i32>,
    pub administrative_count: Option<i32>,
    pub external_people_count: Option<i32>,
    pub speaker_full_name: Option<String>,
    pub speaker_origin: Option<String>,
    pub speaker_company: Option<String>,
    pub consultancy_entity_name: Option<String>,
    pub consultancy_sector_id: Option<String>,
    pub consultancy_value: Option<Decimal>,
    pub evidence_event_planning: bool,
    pub evidence_attendance_control: bool,
    pub evidence_program_design_guide: bool,
    pub evidence_audiovisual_record: bool,
}

/// One (population, campus, program, level) → count fact owned by an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryBreakdown {
    pub id: Option<i64>,
    /// Owning activity; `None` until the activity is persisted.
    pub activity_id: Option<i64>,
    pub population: Population,
    /// "CÚCUTA", "OCAÑA", or "N/A" for the professor block.
    pub campus: String,
    pub program: String,
    pub level: EducationLevel,
    pub count: i32,
}

impl BeneficiaryBreakdown {
    /// Stable ordering key: population, campus (accent/case-insensitive),
    /// program (case-folded), then level, unknowns last.
    pub fn sort_key(&self) -> (Population, String, String, EducationLevel) {
        (
            self.population,
            crate::excel::normalize::norm_key(&self.campus),
            crate::excel::normalize::norm_key(&self.program),
            self.level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_round_trips_through_str() {
        for p in [Population::Students, Population::Graduates, Population::Professor] {
            assert_eq!(Population::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn test_level_parse_accepts_plain_spelling() {
        assert_eq!(EducationLevel::parse("tecnico"), Some(EducationLevel::Tecnico));
        assert_eq!(EducationLevel::parse("tecnólogo"), Some(EducationLevel::Tecnologo));
        assert_eq!(EducationLevel::parse("diplomado"), None);
    }

    #[test]
    fn test_breakdown_sort_key_orders_population_then_campus() {
        let mk = |population, campus: &str, program: &str, level| BeneficiaryBreakdown {
            id: None,
            activity_id: None,
            population,
            campus: campus.to_string(),
            program: program.to_string(),
            level,
            count: 1,
        };
        let mut rows = vec![
            mk(Population::Graduates, "CÚCUTA", "A", EducationLevel::Total),
            mk(Population::Students, "OCAÑA", "B", EducationLevel::Profesional),
            mk(Population::Students, "CÚCUTA", "B", EducationLevel::Tecnologo),
            mk(Population::Students, "CÚCUTA", "B", EducationLevel::Tecnico),
        ];
        rows.sort_by_key(|b| b.sort_key());
        assert_eq!(rows[0].level, EducationLevel::Tecnico);
        assert_eq!(rows[1].level, EducationLevel::Tecnologo);
        assert_eq!(rows[2].campus, "OCAÑA");
        assert_eq!(rows[3].population, Population::Graduates);
    }
}
