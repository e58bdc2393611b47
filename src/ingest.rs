use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{
    Course, GradeProjection, GradeRecord, ProcessedGradesData, Semester, StudentInfo,
};
use crate::scale::GradeScale;
use crate::session::Session;

#[derive(Debug, Serialize, Deserialize)]
struct GradeCsvRow {
    id: String,
    course_code: String,
    course_name: String,
    credits: f64,
    grade: String,
    gpa: f64,
}

impl From<GradeCsvRow> for GradeRecord {
    fn from(row: GradeCsvRow) -> Self {
        Self {
            id: row.id,
            course_code: row.course_code,
            course_name: row.course_name,
            credits: row.credits,
            grade: row.grade,
            gpa: row.gpa,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn check_credits(record: &GradeRecord, row: usize) -> anyhow::Result<()> {
    if !record.credits.is_finite() || record.credits < 0.0 {
        bail!(
            "row {row} ({}): credits must be a non-negative number, got {}",
            record.course_code,
            record.credits
        );
    }
    Ok(())
}

/// Grade records from a `.json` array or a CSV file with
/// `id,course_code,course_name,credits,grade,gpa` headers.
pub fn load_grade_records(path: &Path) -> anyhow::Result<Vec<GradeRecord>> {
    let records: Vec<GradeRecord> = if is_json(path) {
        serde_json::from_reader(open(path)?)
            .with_context(|| format!("invalid grade records JSON in {}", path.display()))?
    } else {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(open(path)?);
        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<GradeCsvRow>().enumerate() {
            let row = result.with_context(|| format!("invalid grade row {} in {}", idx + 1, path.display()))?;
            records.push(GradeRecord::from(row));
        }
        records
    };

    for (idx, record) in records.iter().enumerate() {
        check_credits(record, idx + 1)?;
    }

    info!(path = %path.display(), records = records.len(), "grade records loaded");
    Ok(records)
}

pub fn load_processed_grades(path: &Path) -> anyhow::Result<ProcessedGradesData> {
    let data: ProcessedGradesData = serde_json::from_reader(open(path)?)
        .with_context(|| format!("invalid transcript JSON in {}", path.display()))?;
    info!(
        path = %path.display(),
        semesters = data.semesters.len(),
        courses = data.all_courses.len(),
        "transcript loaded"
    );
    Ok(data)
}

/// A grade scale from a JSON object (`{"A": 4.0, ...}`) or a CSV file with `grade,gpa` headers.
pub fn load_grade_scale(path: &Path) -> anyhow::Result<GradeScale> {
    let pairs: Vec<(String, f64)> = if is_json(path) {
        let map: std::collections::HashMap<String, f64> = serde_json::from_reader(open(path)?)
            .with_context(|| format!("invalid grade scale JSON in {}", path.display()))?;
        map.into_iter().collect()
    } else {
        #[derive(Deserialize)]
        struct ScaleRow {
            grade: String,
            gpa: f64,
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(open(path)?);
        let mut pairs = Vec::new();
        for (idx, result) in reader.deserialize::<ScaleRow>().enumerate() {
            let row = result.with_context(|| format!("invalid grade scale row {} in {}", idx + 1, path.display()))?;
            pairs.push((row.grade, row.gpa));
        }
        pairs
    };

    if pairs.is_empty() {
        bail!("grade scale {} has no entries", path.display());
    }

    let scale = GradeScale::from_pairs(pairs);
    info!(path = %path.display(), grades = scale.len(), "grade scale loaded");
    Ok(scale)
}

pub fn load_session(path: &Path) -> anyhow::Result<Session> {
    serde_json::from_reader(open(path)?)
        .with_context(|| format!("invalid session JSON in {}", path.display()))
}

pub fn write_grade_records_csv(path: &Path, records: &[GradeRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(GradeCsvRow {
            id: record.id.clone(),
            course_code: record.course_code.clone(),
            course_name: record.course_name.clone(),
            credits: record.credits,
            grade: record.grade.clone(),
            gpa: record.gpa,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("failed to write JSON to {}", path.display()))
}

pub fn sample_records() -> Vec<GradeRecord> {
    let rows = [
        ("1", "MATH101", "Calculus I", 4.0, "A", 4.0),
        ("2", "PHYS102", "Physics II", 4.0, "A-", 3.7),
        ("3", "ENG101", "English Literature", 3.0, "B+", 3.3),
        ("4", "CHEM101", "Chemistry I", 4.0, "A", 4.0),
        ("5", "HIST101", "History of Science", 3.0, "A-", 3.7),
    ];

    rows.into_iter()
        .map(|(id, code, name, credits, grade, gpa)| GradeRecord {
            id: id.to_string(),
            course_code: code.to_string(),
            course_name: name.to_string(),
            credits,
            grade: grade.to_string(),
            gpa,
        })
        .collect()
}

pub fn sample_transcript() -> ProcessedGradesData {
    fn course(code: &str, name: &str, credits: f64, score: Option<f64>, grade: &str) -> Course {
        Course {
            course_code: code.to_string(),
            course_name: name.to_string(),
            credits,
            score,
            grade: grade.to_string(),
        }
    }

    let fall = Semester {
        semester: "Fall 2024".to_string(),
        semester_gpa: Some(3.7),
        cumulative_gpa: Some(3.7),
        courses: vec![
            course("MATH101", "Calculus I", 4.0, Some(9.1), "A"),
            course("PHYS102", "Physics II", 4.0, Some(8.4), "A-"),
            course("ENG101", "English Literature", 3.0, Some(7.8), "B+"),
        ],
    };
    let spring = Semester {
        semester: "Spring 2025".to_string(),
        semester_gpa: Some(3.85),
        cumulative_gpa: Some(3.77),
        courses: vec![
            course("CHEM101", "Chemistry I", 4.0, Some(9.0), "A"),
            course("HIST101", "History of Science", 3.0, None, "A-"),
            course("CS201", "Data Structures", 3.0, None, "NA"),
        ],
    };

    ProcessedGradesData {
        student_info: StudentInfo {
            name: Some("Avery Lee".to_string()),
            student_id: Some("GS-2022-0147".to_string()),
            faculty: Some("Faculty of Science".to_string()),
            major: Some("Applied Physics".to_string()),
            class_name: Some("AP-22A".to_string()),
            cohort: Some("2022-2026".to_string()),
        },
        grade_projection: GradeProjection {
            current_cgpa: 3.77,
            current_classification_en: "Excellent".to_string(),
            total_credits: 18.0,
        },
        all_courses: fall.courses.iter().chain(spring.courses.iter()).cloned().collect(),
        semesters: vec![fall, spring],
    }
}
