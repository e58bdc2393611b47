use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ChartPoint, GradeCount, GradeCredits, GradeRecord};

/// All three chart inputs for one grade list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_series: Vec<ChartPoint>,
    pub grade_distribution: Vec<GradeCount>,
    pub credits_by_grade: Vec<GradeCredits>,
}

pub fn chart_data(records: &[GradeRecord]) -> ChartData {
    ChartData {
        chart_series: chart_series(records),
        grade_distribution: grade_distribution(records),
        credits_by_grade: credits_by_grade(records),
    }
}

pub fn chart_series(records: &[GradeRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            name: record.course_code.clone(),
            gpa: record.gpa,
            credits: record.credits,
        })
        .collect()
}

/// Number of records per grade, in first-seen grade order.
pub fn grade_distribution(records: &[GradeRecord]) -> Vec<GradeCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<GradeCount> = Vec::new();

    for record in records {
        let slot = *index.entry(record.grade.as_str()).or_insert_with(|| {
            counts.push(GradeCount {
                name: record.grade.clone(),
                value: 0,
            });
            counts.len() - 1
        });
        counts[slot].value += 1;
    }

    counts
}

/// Credits summed per grade, in first-seen grade order.
pub fn credits_by_grade(records: &[GradeRecord]) -> Vec<GradeCredits> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<GradeCredits> = Vec::new();

    for record in records {
        let slot = *index.entry(record.grade.as_str()).or_insert_with(|| {
            totals.push(GradeCredits {
                grade: record.grade.clone(),
                credits: 0.0,
            });
            totals.len() - 1
        });
        totals[slot].credits += record.credits;
    }

    totals
}

pub fn total_credits(records: &[GradeRecord]) -> f64 {
    records.iter().map(|record| record.credits).sum()
}

/// Credit-weighted GPA, or `None` when there are no credits to weight by.
pub fn weighted_gpa(records: &[GradeRecord]) -> Option<f64> {
    let credits = total_credits(records);
    if credits <= 0.0 {
        return None;
    }
    let points: f64 = records.iter().map(|record| record.gpa * record.credits).sum();
    Some(points / credits)
}
