use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: f64,
    pub grade: String,
    pub gpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePredictorInput {
    pub current_gpa: f64,
    pub total_credits: f64,
    pub target_gpa: f64,
}

/// One bar of the per-course GPA chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub gpa: f64,
    pub credits: f64,
}

/// One slice of the grade distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCredits {
    pub grade: String,
    pub credits: f64,
}

/// Student header of a transcript. Every field is free text and may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[serde(default, alias = "ten_sinh_vien")]
    pub name: Option<String>,
    #[serde(default, alias = "ma_sinh_vien")]
    pub student_id: Option<String>,
    #[serde(default, alias = "khoa")]
    pub faculty: Option<String>,
    #[serde(default, alias = "nganh")]
    pub major: Option<String>,
    #[serde(default, alias = "lop")]
    pub class_name: Option<String>,
    #[serde(default, alias = "khoa_hoc")]
    pub cohort: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeProjection {
    pub current_cgpa: f64,
    pub current_classification_en: String,
    pub total_credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub course_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub course_name: String,
    pub credits: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grade: String,
}

/// Transcript producers send `null` for text they do not have; treat it like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Course {
    /// Courses without a grade, or still marked "NA", are left out of rendered tables.
    pub fn has_final_grade(&self) -> bool {
        !self.grade.is_empty() && self.grade != "NA"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub semester: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_gpa: Option<f64>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedGradesData {
    #[serde(default)]
    pub student_info: StudentInfo,
    #[serde(default)]
    pub grade_projection: GradeProjection,
    #[serde(default)]
    pub all_courses: Vec<Course>,
    #[serde(default)]
    pub semesters: Vec<Semester>,
}
