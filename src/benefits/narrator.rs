use super::tier::{BenefitOutcome, Tier};

pub const UNCLASSIFIED_MESSAGE: &str = "Unable to calculate the benefit.";

/// Explain an outcome to the student.
///
/// Pass tiers return their description as-is. Benefit tiers add a header, the
/// exemption with its grade, and a scholarship line only when one is granted.
pub fn narrate(outcome: &BenefitOutcome) -> String {
    let benefit = match outcome {
        BenefitOutcome::Classified(c) => c,
        BenefitOutcome::Unclassified => return UNCLASSIFIED_MESSAGE.to_string(),
    };

    if matches!(benefit.tier, Tier::NotApproved | Tier::Approved) {
        return benefit.description.to_string();
    }

    let mut message = format!("{}\n\n", benefit.description);
    message.push_str("**Benefits obtained:**\n");
    message.push_str(&format!(
        "- {} with a grade of **{}**\n",
        benefit.exemption, benefit.grade
    ));

    if benefit.scholarship_percent > 0 {
        message.push_str(&format!(
            "- **{}%** scholarship on graduation fees\n",
            benefit.scholarship_percent
        ));
    }

    message
}
