use std::fmt::Write;

use crate::aggregate;
use crate::models::GradeRecord;
use crate::numbers::{plain, to_fixed};
use crate::predict::Prediction;

pub fn build_report(records: &[GradeRecord], prediction: Option<&Prediction>) -> String {
    let series = aggregate::chart_series(records);
    let distribution = aggregate::grade_distribution(records);
    let credits = aggregate::credits_by_grade(records);

    let mut output = String::new();

    let _ = writeln!(output, "# Grade Summary");
    let _ = writeln!(
        output,
        "{} courses, {} credits",
        records.len(),
        plain(aggregate::total_credits(records))
    );
    match aggregate::weighted_gpa(records) {
        Some(gpa) => {
            let _ = writeln!(output, "Credit-weighted GPA: {}", to_fixed(gpa, 2));
        }
        None => {
            let _ = writeln!(output, "Credit-weighted GPA: n/a");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## GPA by Course");

    if series.is_empty() {
        let _ = writeln!(output, "No grades recorded.");
    } else {
        for point in series.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({} credits)",
                point.name,
                to_fixed(point.gpa, 2),
                plain(point.credits)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");

    if distribution.is_empty() {
        let _ = writeln!(output, "No grades recorded.");
    } else {
        for entry in distribution.iter() {
            let _ = writeln!(output, "- {}: {}", entry.name, entry.value);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Credits Earned by Grade");

    if credits.is_empty() {
        let _ = writeln!(output, "No grades recorded.");
    } else {
        for entry in credits.iter() {
            let _ = writeln!(output, "- {}: {} credits", entry.grade, plain(entry.credits));
        }
    }

    if let Some(prediction) = prediction {
        let _ = writeln!(output);
        let _ = writeln!(output, "## GPA Projection");
        let _ = writeln!(output, "{}", prediction.message);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::sample_records;
    use crate::models::GradePredictorInput;
    use crate::predict::{predict_with_horizon, DEFAULT_HORIZON_CREDITS};

    #[test]
    fn report_lists_every_aggregate_section() {
        let report = build_report(&sample_records(), None);
        assert!(report.starts_with("# Grade Summary\n5 courses, 18 credits\n"));
        assert!(report.contains("Credit-weighted GPA: 3.77"));
        assert!(report.contains("- MATH101: 4.00 (4 credits)"));
        assert!(report.contains("## Grade Distribution\n- A: 2\n- A-: 2\n- B+: 1\n"));
        assert!(report.contains("- A: 8 credits"));
        assert!(!report.contains("GPA Projection"));
    }

    #[test]
    fn report_includes_prediction_when_given() {
        let input = GradePredictorInput {
            current_gpa: 3.75,
            total_credits: 18.0,
            target_gpa: 3.9,
        };
        let prediction = predict_with_horizon(&input, DEFAULT_HORIZON_CREDITS);
        let report = build_report(&sample_records(), Some(&prediction));
        assert!(report.contains("## GPA Projection\nYou need to achieve an average of 4.13"));
    }

    #[test]
    fn empty_records_produce_placeholder_sections() {
        let report = build_report(&[], None);
        assert!(report.contains("0 courses, 0 credits"));
        assert!(report.contains("Credit-weighted GPA: n/a"));
        assert_eq!(report.matches("No grades recorded.").count(), 3);
    }
}
