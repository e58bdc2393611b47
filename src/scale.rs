use std::collections::HashMap;

/// Letter grade to grade-point lookup.
///
/// Keys are compared as exact strings (case is significant). A grade that is not
/// in the table resolves to `0.0` so rendering never stops on an unexpected letter.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    points: HashMap<String, f64>,
}

const FOUR_POINT_SCALE: [(&str, f64); 13] = [
    ("A+", 4.0),
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D+", 1.3),
    ("D", 1.0),
    ("D-", 0.7),
    ("F", 0.0),
];

impl GradeScale {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            points: pairs.into_iter().map(|(grade, gpa)| (grade.into(), gpa)).collect(),
        }
    }

    pub fn gpa_for(&self, grade: &str) -> f64 {
        self.points.get(grade.trim()).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, grade: &str) -> bool {
        self.points.contains_key(grade.trim())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::from_pairs(FOUR_POINT_SCALE)
    }
}
