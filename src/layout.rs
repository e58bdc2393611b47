//! Transcript layout: turns a processed transcript into pages of positioned draw operations.
//!
//! Coordinates are millimetres on an A4 portrait page, origin top-left, y growing
//! downwards. Text `y` is the baseline. Backends in `render` translate the result
//! into a concrete file format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::metrics::{FontWeight, TextMeasure};
use crate::models::{Course, ProcessedGradesData, Semester, StudentInfo};
use crate::numbers::{plain, to_fixed};
use crate::scale::GradeScale;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 15.0;

const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
/// A semester starting below this line moves to a fresh page.
const SEMESTER_BREAK_Y: f64 = PAGE_HEIGHT - 60.0;
/// Table rows must end above this line; the footer lives underneath.
const TABLE_BOTTOM_Y: f64 = PAGE_HEIGHT - 20.0;

const PT_TO_MM: f64 = 25.4 / 72.0;
const LINE_HEIGHT_FACTOR: f64 = 1.15;
const CELL_PADDING: f64 = 2.0;
const HEAD_FONT_SIZE: f64 = 9.0;
const BODY_FONT_SIZE: f64 = 8.0;

const INFO_VALUE_X: f64 = MARGIN + 50.0;
const INFO_VALUE_WIDTH: f64 = 120.0;
const SEMESTER_LABEL_WIDTH: f64 = 170.0;
const LEFT_COLUMN_X: f64 = MARGIN + 5.0;
const RIGHT_COLUMN_X: f64 = MARGIN + 100.0;

const TABLE_COLUMNS: [(&str, f64); 6] = [
    ("Code", 25.0),
    ("Course Name", 75.0),
    ("Credits", 20.0),
    ("Score", 20.0),
    ("Grade", 20.0),
    ("GPA", 20.0),
];

pub const TITLE: &str = "ACADEMIC TRANSCRIPT";
pub const SUBTITLE: &str = "Official Academic Record";
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

const PRIMARY: Rgb = Rgb(41, 128, 185);
const SEMESTER_BAND: Rgb = Rgb(52, 73, 94);
const SUMMARY_BAND: Rgb = Rgb(236, 240, 241);
const SHADED_ROW: Rgb = Rgb(245, 245, 245);
const FOOTER_GRAY: Rgb = Rgb(128, 128, 128);
const WHITE: Rgb = Rgb(255, 255, 255);
const BLACK: Rgb = Rgb(0, 0, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        weight: FontWeight,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::FillRect { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptDocument {
    pub page_width: f64,
    pub page_height: f64,
    pub generated_on: NaiveDate,
    /// File name without extension; backends append their own.
    pub file_stem: String,
    pub pages: Vec<Page>,
}

impl TranscriptDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// `Transcript_{studentId}_{YYYY-MM-DD}`.
pub fn transcript_file_stem(student_id: Option<&str>, generated_on: NaiveDate) -> String {
    let id = student_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or("unknown")
        .replace(['/', '\\'], "_");
    format!("Transcript_{id}_{}", generated_on.format("%Y-%m-%d"))
}

/// Greedy word wrap on single spaces. A word wider than `max_width` keeps its own line.
pub fn split_text(
    measure: &dyn TextMeasure,
    text: &str,
    max_width: f64,
    size: f64,
    weight: FontWeight,
) -> anyhow::Result<Vec<String>> {
    if text.is_empty() {
        return Ok(vec![String::new()]);
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if !current.is_empty() && measure.text_width(&candidate, size, weight)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    Ok(lines)
}

/// Word wrap for table cells: a word wider than `max_width` is broken between characters.
pub fn split_cell_text(
    measure: &dyn TextMeasure,
    text: &str,
    max_width: f64,
    size: f64,
    weight: FontWeight,
) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in split_text(measure, text, max_width, size, weight)? {
        if measure.text_width(&line, size, weight)? <= max_width {
            lines.push(line);
            continue;
        }

        let mut current = String::new();
        for ch in line.chars() {
            current.push(ch);
            if current.chars().count() > 1 && measure.text_width(&current, size, weight)? > max_width {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    Ok(lines)
}

type SplitFn = fn(&dyn TextMeasure, &str, f64, f64, FontWeight) -> anyhow::Result<Vec<String>>;

/// Wraps `text` with `split`, or keeps it on one unwrapped line if it cannot be measured.
fn wrap_or_single(
    split: SplitFn,
    measure: &dyn TextMeasure,
    text: &str,
    max_width: f64,
    size: f64,
    weight: FontWeight,
) -> Vec<String> {
    match split(measure, text, max_width, size, weight) {
        Ok(lines) => lines,
        Err(err) => {
            warn!(error = %err, "text measurement failed; rendering on a single line");
            vec![text.to_string()]
        }
    }
}

fn centered_x(measure: &dyn TextMeasure, text: &str, center: f64, size: f64, weight: FontWeight) -> f64 {
    let width = measure.text_width(text, size, weight).unwrap_or_else(|err| {
        warn!(error = %err, "text measurement failed; estimating width for centering");
        text.chars().count() as f64 * 0.5 * size * PT_TO_MM
    });
    center - width / 2.0
}

fn line_height(size: f64) -> f64 {
    size * PT_TO_MM * LINE_HEIGHT_FACTOR
}

fn info_value(value: Option<&String>) -> &str {
    value
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_VALUE)
}

struct TableRow {
    cells: Vec<Vec<String>>,
    height: f64,
}

struct Layout<'a> {
    scale: &'a GradeScale,
    measure: &'a dyn TextMeasure,
    finished: Vec<Page>,
    current: Page,
    y: f64,
}

impl<'a> Layout<'a> {
    fn new(scale: &'a GradeScale, measure: &'a dyn TextMeasure) -> Self {
        Self {
            scale,
            measure,
            finished: Vec::new(),
            current: Page::default(),
            y: MARGIN,
        }
    }

    fn new_page(&mut self) {
        let done = std::mem::take(&mut self.current);
        self.finished.push(done);
        self.y = MARGIN;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.current.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn text(&mut self, text: impl Into<String>, x: f64, y: f64, size: f64, weight: FontWeight, color: Rgb) {
        self.current.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            weight,
            color,
        });
    }

    fn centered_text(&mut self, text: &str, y: f64, size: f64, weight: FontWeight, color: Rgb) {
        let x = centered_x(self.measure, text, PAGE_WIDTH / 2.0, size, weight);
        self.text(text, x, y, size, weight, color);
    }

    /// Draws `text` wrapped to `max_width` with `pitch` between baselines; returns the line count.
    #[allow(clippy::too_many_arguments)]
    fn wrapped_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: f64,
        pitch: f64,
        size: f64,
        weight: FontWeight,
        color: Rgb,
    ) -> usize {
        let lines = wrap_or_single(split_text, self.measure, text, max_width, size, weight);
        for (index, line) in lines.iter().enumerate() {
            self.text(line.as_str(), x, y + index as f64 * pitch, size, weight, color);
        }
        lines.len()
    }

    fn header(&mut self) {
        self.fill_rect(0.0, 0.0, PAGE_WIDTH, 40.0, PRIMARY);
        self.centered_text(TITLE, 20.0, 24.0, FontWeight::Bold, WHITE);
        self.centered_text(SUBTITLE, 30.0, 12.0, FontWeight::Normal, WHITE);
        self.y = 50.0;
    }

    fn student_info(&mut self, info: &StudentInfo) {
        self.text("Student Information", MARGIN, self.y, 14.0, FontWeight::Bold, BLACK);
        self.y += 8.0;

        let rows = [
            ("Student Name:", info_value(info.name.as_ref())),
            ("Student ID:", info_value(info.student_id.as_ref())),
            ("Faculty:", info_value(info.faculty.as_ref())),
            ("Major:", info_value(info.major.as_ref())),
            ("Class:", info_value(info.class_name.as_ref())),
            ("Academic Year:", info_value(info.cohort.as_ref())),
        ];

        for (label, value) in rows {
            self.text(label, MARGIN, self.y, 10.0, FontWeight::Bold, BLACK);
            let lines = self.wrapped_text(
                value,
                INFO_VALUE_X,
                self.y,
                INFO_VALUE_WIDTH,
                5.0,
                10.0,
                FontWeight::Normal,
                BLACK,
            );
            self.y += lines as f64 * 6.0;
        }

        self.y += 5.0;
    }

    fn summary(&mut self, data: &ProcessedGradesData) {
        let projection = &data.grade_projection;
        let top = self.y;

        self.fill_rect(MARGIN, top - 5.0, CONTENT_WIDTH, 25.0, SUMMARY_BAND);
        self.text("Academic Summary", LEFT_COLUMN_X, top + 5.0, 12.0, FontWeight::Bold, BLACK);

        self.text(
            format!("Current CGPA: {}", to_fixed(projection.current_cgpa, 2)),
            LEFT_COLUMN_X,
            top + 12.0,
            10.0,
            FontWeight::Normal,
            BLACK,
        );
        self.text(
            format!("Classification: {}", projection.current_classification_en),
            LEFT_COLUMN_X,
            top + 18.0,
            10.0,
            FontWeight::Normal,
            BLACK,
        );
        self.text(
            format!("Total Credits: {}", plain(projection.total_credits)),
            RIGHT_COLUMN_X,
            top + 12.0,
            10.0,
            FontWeight::Normal,
            BLACK,
        );
        self.text(
            format!("Total Courses: {}", data.all_courses.len()),
            RIGHT_COLUMN_X,
            top + 18.0,
            10.0,
            FontWeight::Normal,
            BLACK,
        );

        self.y += 35.0;
    }

    fn semester(&mut self, semester: &Semester) {
        if self.y > SEMESTER_BREAK_Y {
            self.new_page();
        }

        let label_lines = wrap_or_single(
            split_text,
            self.measure,
            &semester.semester,
            SEMESTER_LABEL_WIDTH,
            12.0,
            FontWeight::Bold,
        );
        let extra = label_lines.len().saturating_sub(1) as f64 * 5.0;

        self.fill_rect(MARGIN, self.y - 5.0, CONTENT_WIDTH, 10.0 + extra, SEMESTER_BAND);
        for (index, line) in label_lines.into_iter().enumerate() {
            let y = self.y + 2.0 + index as f64 * 5.0;
            self.text(line, LEFT_COLUMN_X, y, 12.0, FontWeight::Bold, WHITE);
        }
        self.y += extra + 8.0;

        if semester.semester_gpa.is_some() || semester.cumulative_gpa.is_some() {
            if let Some(gpa) = semester.semester_gpa {
                let line = format!("Semester GPA: {}", to_fixed(gpa, 2));
                self.text(line, LEFT_COLUMN_X, self.y, 9.0, FontWeight::Normal, BLACK);
            }
            if let Some(gpa) = semester.cumulative_gpa {
                let line = format!("Cumulative GPA: {}", to_fixed(gpa, 2));
                self.text(line, RIGHT_COLUMN_X, self.y, 9.0, FontWeight::Normal, BLACK);
            }
            self.y += 5.0;
        }

        let courses: Vec<&Course> = semester.courses.iter().filter(|c| c.has_final_grade()).collect();
        if courses.is_empty() {
            self.y += 5.0;
            return;
        }

        self.course_table(&courses);
        self.y += 5.0;
    }

    fn table_row(&self, values: [String; 6], size: f64, weight: FontWeight) -> TableRow {
        let cells: Vec<Vec<String>> = values
            .iter()
            .zip(TABLE_COLUMNS.iter())
            .map(|(value, (_, width))| {
                let inner = width - 2.0 * CELL_PADDING;
                wrap_or_single(split_cell_text, self.measure, value, inner, size, weight)
            })
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        TableRow {
            cells,
            height: lines as f64 * line_height(size) + 2.0 * CELL_PADDING,
        }
    }

    fn course_values(&self, course: &Course) -> [String; 6] {
        [
            course.course_code.clone(),
            course.course_name.clone(),
            plain(course.credits),
            course
                .score
                .map(|score| to_fixed(score, 1))
                .unwrap_or_else(|| "-".to_string()),
            course.grade.clone(),
            to_fixed(self.scale.gpa_for(&course.grade), 1),
        ]
    }

    fn draw_row(&mut self, row: &TableRow, fill: Option<Rgb>, size: f64, weight: FontWeight, color: Rgb) {
        if let Some(fill) = fill {
            self.fill_rect(MARGIN, self.y, CONTENT_WIDTH, row.height, fill);
        }

        let pitch = line_height(size);
        let mut x = MARGIN;
        for (lines, (_, width)) in row.cells.iter().zip(TABLE_COLUMNS.iter()) {
            for (index, line) in lines.iter().enumerate() {
                let baseline = self.y + CELL_PADDING + pitch * (index as f64 + 0.8);
                self.text(line.as_str(), x + CELL_PADDING, baseline, size, weight, color);
            }
            x += width;
        }

        self.y += row.height;
    }

    fn course_table(&mut self, courses: &[&Course]) {
        let head = self.table_row(
            TABLE_COLUMNS.map(|(title, _)| title.to_string()),
            HEAD_FONT_SIZE,
            FontWeight::Bold,
        );
        let rows: Vec<TableRow> = courses
            .iter()
            .map(|course| self.table_row(self.course_values(course), BODY_FONT_SIZE, FontWeight::Normal))
            .collect();

        let first_height = rows.first().map(|row| row.height).unwrap_or(0.0);
        if self.y + head.height + first_height > TABLE_BOTTOM_Y {
            self.new_page();
        }
        self.draw_row(&head, Some(PRIMARY), HEAD_FONT_SIZE, FontWeight::Bold, WHITE);

        for (index, row) in rows.iter().enumerate() {
            if self.y + row.height > TABLE_BOTTOM_Y {
                self.new_page();
                self.draw_row(&head, Some(PRIMARY), HEAD_FONT_SIZE, FontWeight::Bold, WHITE);
            }
            let fill = (index % 2 == 1).then_some(SHADED_ROW);
            self.draw_row(row, fill, BODY_FONT_SIZE, FontWeight::Normal, BLACK);
        }
    }

    fn finish(mut self, generated_on: NaiveDate) -> Vec<Page> {
        let last = std::mem::take(&mut self.current);
        self.finished.push(last);

        let total = self.finished.len();
        let stamp = format!("Generated on {}", generated_on.format("%B %-d, %Y"));
        for (index, page) in self.finished.iter_mut().enumerate() {
            let numbering = format!("Page {} of {total}", index + 1);
            for (text, y) in [(numbering, PAGE_HEIGHT - 10.0), (stamp.clone(), PAGE_HEIGHT - 5.0)] {
                let x = centered_x(self.measure, &text, PAGE_WIDTH / 2.0, 8.0, FontWeight::Normal);
                page.ops.push(DrawOp::Text {
                    text,
                    x,
                    y,
                    size: 8.0,
                    weight: FontWeight::Normal,
                    color: FOOTER_GRAY,
                });
            }
        }

        self.finished
    }
}

/// Lay out a full transcript. Never fails: optional fields are rendered conditionally
/// and unmeasurable text falls back to a single line.
pub fn build_transcript(
    data: &ProcessedGradesData,
    scale: &GradeScale,
    measure: &dyn TextMeasure,
    generated_on: NaiveDate,
) -> TranscriptDocument {
    let mut layout = Layout::new(scale, measure);

    layout.header();
    layout.student_info(&data.student_info);
    layout.summary(data);
    for semester in &data.semesters {
        layout.semester(semester);
    }

    let pages = layout.finish(generated_on);
    debug!(pages = pages.len(), semesters = data.semesters.len(), "transcript laid out");

    TranscriptDocument {
        page_width: PAGE_WIDTH,
        page_height: PAGE_HEIGHT,
        generated_on,
        file_stem: transcript_file_stem(data.student_info.student_id.as_deref(), generated_on),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HelveticaMetrics;
    use crate::models::GradeProjection;

    struct FailingMeasure;

    impl TextMeasure for FailingMeasure {
        fn text_width(&self, _text: &str, _size: f64, _weight: FontWeight) -> anyhow::Result<f64> {
            anyhow::bail!("metrics unavailable")
        }
    }

    /// Every character is 1mm wide, whatever the size.
    struct MonoMeasure;

    impl TextMeasure for MonoMeasure {
        fn text_width(&self, text: &str, _size: f64, _weight: FontWeight) -> anyhow::Result<f64> {
            Ok(text.chars().count() as f64)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn course(code: &str, grade: &str, score: Option<f64>) -> Course {
        Course {
            course_code: code.to_string(),
            course_name: format!("{code} Fundamentals"),
            credits: 3.0,
            score,
            grade: grade.to_string(),
        }
    }

    fn semester(label: &str, courses: Vec<Course>) -> Semester {
        Semester {
            semester: label.to_string(),
            semester_gpa: Some(3.456),
            cumulative_gpa: Some(3.5),
            courses,
        }
    }

    fn data(semesters: Vec<Semester>) -> ProcessedGradesData {
        let all_courses = semesters.iter().flat_map(|s| s.courses.clone()).collect();
        ProcessedGradesData {
            student_info: StudentInfo {
                name: Some("Avery Lee".to_string()),
                student_id: Some("SV2026".to_string()),
                faculty: Some("Engineering".to_string()),
                major: None,
                class_name: Some(String::new()),
                cohort: Some("2022-2026".to_string()),
            },
            grade_projection: GradeProjection {
                current_cgpa: 3.456,
                current_classification_en: "Very Good".to_string(),
                total_credits: 96.0,
            },
            all_courses,
            semesters,
        }
    }

    fn build(data: &ProcessedGradesData) -> TranscriptDocument {
        build_transcript(data, &GradeScale::default(), &HelveticaMetrics, date())
    }

    fn all_texts(doc: &TranscriptDocument) -> Vec<String> {
        doc.pages
            .iter()
            .flat_map(|page| page.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn first_page_carries_header_info_and_summary() {
        let doc = build(&data(vec![]));
        assert_eq!(doc.page_count(), 1);
        let texts: Vec<&str> = doc.pages[0].texts().collect();
        for expected in [
            TITLE,
            SUBTITLE,
            "Student Information",
            "Avery Lee",
            "SV2026",
            "Academic Summary",
            "Current CGPA: 3.46",
            "Classification: Very Good",
            "Total Credits: 96",
            "Total Courses: 0",
        ] {
            assert!(texts.contains(&expected), "missing {expected:?}");
        }
    }

    #[test]
    fn missing_student_fields_render_placeholder() {
        let doc = build(&data(vec![]));
        let placeholders = doc.pages[0].texts().filter(|t| *t == MISSING_VALUE).count();
        assert_eq!(placeholders, 2);
    }

    #[test]
    fn ungraded_courses_leave_header_and_gpa_line() {
        let doc = build(&data(vec![semester("Fall 2025", vec![course("CS101", "NA", None)])]));
        let texts = all_texts(&doc);
        assert!(texts.iter().any(|t| t == "Fall 2025"));
        assert!(texts.iter().any(|t| t == "Semester GPA: 3.46"));
        assert!(texts.iter().any(|t| t == "Cumulative GPA: 3.50"));
        assert!(!texts.iter().any(|t| t == "Course Name"));
        assert!(!texts.iter().any(|t| t == "CS101"));
    }

    #[test]
    fn gpa_line_only_shows_present_values() {
        let mut only_cumulative = semester("Spring 2026", vec![]);
        only_cumulative.semester_gpa = None;
        let mut neither = semester("Summer 2026", vec![]);
        neither.semester_gpa = None;
        neither.cumulative_gpa = None;

        let texts = all_texts(&build(&data(vec![only_cumulative, neither])));
        assert!(!texts.iter().any(|t| t.starts_with("Semester GPA")));
        assert_eq!(texts.iter().filter(|t| t.starts_with("Cumulative GPA")).count(), 1);
    }

    #[test]
    fn table_rows_format_score_grade_and_gpa() {
        let doc = build(&data(vec![semester(
            "Fall 2025",
            vec![course("CS101", "A-", Some(8.75)), course("CS102", "B", None)],
        )]));
        let texts = all_texts(&doc);
        for expected in ["Code", "Course Name", "GPA", "CS101", "8.8", "A-", "3.7", "-", "3.0", "3"] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected:?}");
        }
    }

    #[test]
    fn alternate_rows_are_shaded() {
        let courses = (0..4).map(|i| course(&format!("C{i}"), "B", None)).collect();
        let doc = build(&data(vec![semester("Fall 2025", courses)]));
        let shaded = doc.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == SHADED_ROW))
            .count();
        assert_eq!(shaded, 2);
    }

    #[test]
    fn long_tables_continue_with_repeated_header() {
        let courses = (0..80).map(|i| course(&format!("C{i:03}"), "A", Some(9.0))).collect();
        let doc = build(&data(vec![semester("Fall 2025", courses)]));

        assert!(doc.page_count() >= 3);
        for page in &doc.pages {
            assert!(page.texts().any(|t| t == "Course Name"));
        }
        let rows: usize = doc
            .pages
            .iter()
            .map(|page| page.texts().filter(|t| t.starts_with("C0") && t.len() == 4).count())
            .sum();
        assert_eq!(rows, 80);
    }

    #[test]
    fn table_rows_stay_above_the_footer() {
        let courses = (0..80).map(|i| course(&format!("C{i:03}"), "A", None)).collect();
        let doc = build(&data(vec![semester("Fall 2025", courses)]));
        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::FillRect { y, height, .. } = op {
                    assert!(y + height <= TABLE_BOTTOM_Y + 1e-9);
                }
            }
        }
    }

    #[test]
    fn semesters_break_to_new_page_near_bottom() {
        let semesters = (0..12)
            .map(|i| semester(&format!("Term {i}"), vec![course("X1", "B", None)]))
            .collect();
        let doc = build(&data(semesters));
        assert!(doc.page_count() > 1);

        for page in &doc.pages[1..] {
            let first_band_y = page.ops.iter().find_map(|op| match op {
                DrawOp::FillRect { y, color, .. } if *color == SEMESTER_BAND => Some(*y),
                _ => None,
            });
            if let Some(y) = first_band_y {
                assert!(y <= MARGIN);
            }
        }
    }

    #[test]
    fn every_page_gets_numbered_footer() {
        let courses = (0..80).map(|i| course(&format!("C{i:03}"), "A", None)).collect();
        let doc = build(&data(vec![semester("Fall 2025", courses)]));
        let total = doc.page_count();
        for (index, page) in doc.pages.iter().enumerate() {
            let numbering = format!("Page {} of {total}", index + 1);
            assert!(page.texts().any(|t| t == numbering));
            assert!(page.texts().any(|t| t == "Generated on March 9, 2026"));
        }
    }

    #[test]
    fn file_stem_uses_student_id_and_date() {
        let first = build(&data(vec![]));
        let second = build(&data(vec![]));
        assert_eq!(first.file_stem, "Transcript_SV2026_2026-03-09");
        assert_eq!(first.file_stem, second.file_stem);
        assert_eq!(first, second);
    }

    #[test]
    fn file_stem_handles_missing_and_unsafe_ids() {
        assert_eq!(transcript_file_stem(None, date()), "Transcript_unknown_2026-03-09");
        assert_eq!(transcript_file_stem(Some("  "), date()), "Transcript_unknown_2026-03-09");
        assert_eq!(transcript_file_stem(Some("a/b\\c"), date()), "Transcript_a_b_c_2026-03-09");
    }

    #[test]
    fn split_text_wraps_greedily_on_spaces() {
        let lines = split_text(&MonoMeasure, "aaa bbb ccc dddddddd", 7.0, 10.0, FontWeight::Normal).unwrap();
        assert_eq!(lines, ["aaa bbb", "ccc", "dddddddd"]);
    }

    #[test]
    fn split_text_of_empty_string_is_one_empty_line() {
        let lines = split_text(&MonoMeasure, "", 7.0, 10.0, FontWeight::Normal).unwrap();
        assert_eq!(lines, [""]);
    }

    #[test]
    fn long_student_values_wrap_onto_extra_lines() {
        let mut input = data(vec![]);
        input.student_info.faculty = Some("Faculty of Electrical and Electronic Engineering and Applied Computer Science".to_string());
        let doc = build(&input);
        let lines: Vec<&str> = doc.pages[0]
            .texts()
            .filter(|t| t.contains("Faculty of") || t.contains("Science"))
            .collect();
        assert!(lines.len() >= 2);
    }

    #[test]
    fn split_cell_text_breaks_words_wider_than_the_cell() {
        let lines = split_cell_text(&MonoMeasure, "aaa bbbbbbbbbb", 4.0, 10.0, FontWeight::Normal).unwrap();
        assert_eq!(lines, ["aaa", "bbbb", "bbbb", "bb"]);
    }

    #[test]
    fn long_vietnamese_course_names_wrap_inside_their_column() {
        let name = "Lập trình hướng đối tượng và thiết kế phần mềm nâng cao cho hệ thống phân tán";
        let mut long = course("IT3100", "A", Some(9.0));
        long.course_name = name.to_string();
        let doc = build(&data(vec![semester("Học kỳ 1 năm học 2025-2026", vec![long])]));
        let texts = all_texts(&doc);

        assert!(!texts.iter().any(|t| t == name));
        let inner = TABLE_COLUMNS[1].1 - 2.0 * CELL_PADDING;
        let pieces: Vec<&String> = texts.iter().filter(|t| name.contains(t.as_str()) && t.len() > 3).collect();
        assert!(pieces.len() >= 2);
        for piece in pieces {
            let width = HelveticaMetrics
                .text_width(piece, BODY_FONT_SIZE, FontWeight::Normal)
                .unwrap();
            assert!(width <= inner, "{piece:?} is {width}mm wide");
        }
    }

    #[test]
    fn unbroken_course_codes_are_split_across_lines() {
        let code = "INTERDISCIPLINARYSTUDIES2025";
        let mut long = course(code, "A", None);
        long.course_name = "Capstone".to_string();
        let doc = build(&data(vec![semester("Fall 2025", vec![long])]));
        let texts = all_texts(&doc);
        assert!(!texts.iter().any(|t| t == code));
        assert!(texts.iter().any(|t| t.starts_with("INTER") && code.starts_with(t.as_str())));
    }

    #[test]
    fn unmeasurable_text_falls_back_to_single_line() {
        let label = "Fall 2025 \u{1F393} graduating semester with an extended label for the band";
        let mut input = data(vec![semester(label, vec![course("CS101", "A", None)])]);
        let name = "Avery \u{1F393} Lee with a very long name that would normally wrap onto another line";
        input.student_info.name = Some(name.to_string());
        let doc = build(&input);
        let texts = all_texts(&doc);
        assert!(texts.iter().any(|t| t == name));
        assert!(texts.iter().any(|t| t == label));

        let failing = build_transcript(&input, &GradeScale::default(), &FailingMeasure, date());
        assert_eq!(failing.page_count(), 1);
        assert!(all_texts(&failing).iter().any(|t| t == "Page 1 of 1"));
    }

    #[test]
    fn input_is_left_untouched() {
        let input = data(vec![semester("Fall 2025", vec![course("CS101", "NA", None)])]);
        let before = input.clone();
        let _ = build(&input);
        assert_eq!(input, before);
    }
}
