//! Property tests for the benefit ladder and its narrative
//!
//! These pin the institutional policy down for every integer:
//! - each band maps to exactly one tier with fixed grade and scholarship
//! - 241 is the only unclassified score under the reference policy
//! - classification is deterministic
//! - the narrative lists the scholarship line only when one is granted

use exam_benefits::benefits::{
    classify, classify_with, narrate, BenefitOutcome, Exemption, PolicyConfig, Tier,
    UNCLASSIFIED_MESSAGE,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn tier_of(score: i64) -> Option<Tier> {
    classify(score).tier()
}

#[test]
fn scenario_table() {
    let cases = [
        (75, "Not Approved", 0.0, 0),
        (150, "Approved", 0.0, 0),
        (195, "Level 1 — Outstanding", 4.5, 0),
        (225, "Level 2 — Excellent", 4.7, 50),
        (250, "Level 3 — Exceptional", 5.0, 100),
    ];

    for (score, category, grade, scholarship) in cases {
        let outcome = classify(score);
        let c = outcome
            .classification()
            .unwrap_or_else(|| panic!("score {} should be classified", score));
        assert_eq!(c.category, category, "score {}", score);
        assert_eq!(c.grade, grade, "score {}", score);
        assert_eq!(c.scholarship_percent, scholarship, "score {}", score);
    }
}

#[test]
fn every_nominal_score_except_241_is_classified() {
    let unclassified: Vec<i64> = (0..=300)
        .filter(|&s| classify(s) == BenefitOutcome::Unclassified)
        .collect();
    assert_eq!(unclassified, vec![241]);
}

#[test]
fn inclusive_policy_classifies_every_nominal_score() {
    let policy = PolicyConfig::inclusive();
    assert!((0..=300).all(|s| classify_with(s, &policy).is_classified()));
}

#[test]
fn narrative_examples() {
    assert_eq!(narrate(&BenefitOutcome::Unclassified), "Unable to calculate the benefit.");
    assert!(narrate(&classify(75)).contains("Insufficient score"));
    assert!(narrate(&classify(150)).contains("approved"));

    let level2 = narrate(&classify(225));
    assert!(level2.contains("50%"));
    assert!(level2.contains("4.7"));

    let level3 = narrate(&classify(250));
    assert!(level3.contains("100%"));
    assert!(level3.contains("5"));
}

proptest! {
    #[test]
    fn prop_below_80_not_approved(score in i64::MIN..80) {
        let outcome = classify(score);
        let c = outcome.classification().unwrap();
        prop_assert_eq!(c.tier, Tier::NotApproved);
        prop_assert_eq!(c.category, "Not Approved");
        prop_assert_eq!(c.scholarship_percent, 0);
        prop_assert_eq!(c.grade, 0.0);
    }

    #[test]
    fn prop_80_to_179_approved(score in 80i64..=179) {
        let outcome = classify(score);
        let c = outcome.classification().unwrap();
        prop_assert_eq!(c.category, "Approved");
        prop_assert_eq!(c.scholarship_percent, 0);
        prop_assert_eq!(c.grade, 0.0);
    }

    #[test]
    fn prop_180_to_210_level1(score in 180i64..=210) {
        let outcome = classify(score);
        let c = outcome.classification().unwrap();
        prop_assert_eq!(c.category, "Level 1 — Outstanding");
        prop_assert_eq!(c.grade, 4.5);
        prop_assert_eq!(c.scholarship_percent, 0);
        prop_assert_ne!(c.exemption, Exemption::None);
    }

    #[test]
    fn prop_211_to_240_level2(score in 211i64..=240) {
        let outcome = classify(score);
        let c = outcome.classification().unwrap();
        prop_assert_eq!(c.category, "Level 2 — Excellent");
        prop_assert_eq!(c.grade, 4.7);
        prop_assert_eq!(c.scholarship_percent, 50);
    }

    #[test]
    fn prop_242_and_above_level3(score in 242i64..=i64::MAX) {
        let outcome = classify(score);
        let c = outcome.classification().unwrap();
        prop_assert_eq!(c.category, "Level 3 — Exceptional");
        prop_assert_eq!(c.grade, 5.0);
        prop_assert_eq!(c.scholarship_percent, 100);
    }

    #[test]
    fn prop_classify_is_deterministic(score in any::<i64>()) {
        prop_assert_eq!(classify(score), classify(score));
    }

    #[test]
    fn prop_tiers_never_decrease_with_score(a in -50i64..350, b in -50i64..350) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if let (Some(t_low), Some(t_high)) = (tier_of(low), tier_of(high)) {
            prop_assert!(t_low <= t_high, "{} -> {:?}, {} -> {:?}", low, t_low, high, t_high);
        }
    }

    #[test]
    fn prop_scholarship_line_only_when_granted(score in -50i64..350) {
        let outcome = classify(score);
        let message = narrate(&outcome);
        match outcome.classification() {
            None => prop_assert_eq!(message, UNCLASSIFIED_MESSAGE),
            Some(c) if !c.tier.grants_benefits() => prop_assert_eq!(message, c.description),
            Some(c) => {
                prop_assert!(message.starts_with(c.description));
                prop_assert!(message.contains(c.exemption.text()));
                prop_assert_eq!(message.contains("scholarship"), c.scholarship_percent > 0);
            }
        }
    }
}
