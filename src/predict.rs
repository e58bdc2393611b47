use crate::models::GradePredictorInput;
use crate::numbers::{plain, to_fixed};

pub const DEFAULT_HORIZON_CREDITS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    /// The target is already met; any grades keep the GPA at or above it.
    AlreadyMet,
    Reachable,
    /// More than a perfect 4.0 average would be needed.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub needed_average: f64,
    pub horizon_credits: f64,
    pub outlook: Outlook,
    pub message: String,
}

/// Average grade needed over the next `horizon_credits` so the cumulative GPA lands on the target.
///
/// No clamping: values above 4.0 or below 0.0 are reported as computed.
pub fn needed_average(input: &GradePredictorInput, horizon_credits: f64) -> f64 {
    (input.target_gpa * (input.total_credits + horizon_credits)
        - input.current_gpa * input.total_credits)
        / horizon_credits
}

pub fn outlook(needed: f64) -> Outlook {
    if needed <= 0.0 {
        Outlook::AlreadyMet
    } else if needed <= 4.0 {
        Outlook::Reachable
    } else {
        Outlook::Unreachable
    }
}

pub fn predict(input: &GradePredictorInput) -> String {
    predict_with_horizon(input, DEFAULT_HORIZON_CREDITS).message
}

/// `horizon_credits` must be positive; `Config` rejects anything else before it gets here.
pub fn predict_with_horizon(input: &GradePredictorInput, horizon_credits: f64) -> Prediction {
    let needed = needed_average(input, horizon_credits);
    let message = format!(
        "You need to achieve an average of {} in your next {} credits to reach your target GPA of {}.",
        to_fixed(needed, 2),
        plain(horizon_credits),
        input.target_gpa
    );

    Prediction {
        needed_average: needed,
        horizon_credits,
        outlook: outlook(needed),
        message,
    }
}
