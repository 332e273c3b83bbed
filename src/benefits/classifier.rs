use super::bands::Band;
use super::policy::{Level3Boundary, PolicyConfig};
use super::tier::{BenefitClassification, BenefitOutcome, Tier};

/// One rung of the benefit ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rung {
    pub band: Band,
    pub tier: Tier,
}

/// The benefit ladder for a policy, evaluated top to bottom.
///
/// The rungs leave 241 uncovered unless the policy makes Level 3 inclusive.
pub fn ladder(policy: &PolicyConfig) -> [Rung; 5] {
    let level3 = match policy.level3_boundary {
        Level3Boundary::Exclusive => Band::GreaterThan(241),
        Level3Boundary::Inclusive => Band::GreaterEqual(241),
    };

    [
        Rung { band: Band::LessThan(80), tier: Tier::NotApproved },
        Rung { band: Band::Between(80, 179), tier: Tier::Approved },
        Rung { band: Band::Between(180, 210), tier: Tier::Level1 },
        Rung { band: Band::Between(211, 240), tier: Tier::Level2 },
        Rung { band: level3, tier: Tier::Level3 },
    ]
}

/// Classify a global score under the reference policy.
pub fn classify(score: i64) -> BenefitOutcome {
    classify_with(score, &PolicyConfig::default())
}

/// Classify a global score under an explicit policy. First matching rung wins.
pub fn classify_with(score: i64, policy: &PolicyConfig) -> BenefitOutcome {
    ladder(policy)
        .iter()
        .find(|rung| rung.band.matches(score))
        .map(|rung| BenefitOutcome::Classified(BenefitClassification::for_tier(rung.tier)))
        .unwrap_or(BenefitOutcome::Unclassified)
}
