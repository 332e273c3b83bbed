use serde::{Serialize, Serializer};
use std::fmt;

/// The five fixed benefit tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NotApproved,
    Approved,
    Level1,
    Level2,
    Level3,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::NotApproved,
        Tier::Approved,
        Tier::Level1,
        Tier::Level2,
        Tier::Level3,
    ];

    pub fn category(self) -> &'static str {
        match self {
            Tier::NotApproved => "Not Approved",
            Tier::Approved => "Approved",
            Tier::Level1 => "Level 1 — Outstanding",
            Tier::Level2 => "Level 2 — Excellent",
            Tier::Level3 => "Level 3 — Exceptional",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::NotApproved => {
                "Insufficient score to graduate. A minimum of 80 points is required."
            }
            Tier::Approved => {
                "You have approved the Saber Pro exam. Continue with the regular graduation process."
            }
            Tier::Level1 => "Congratulations! You have obtained an outstanding score.",
            Tier::Level2 => "Excellent work! You have reached a superior level of performance.",
            Tier::Level3 => {
                "Extraordinary! You have reached the highest level of academic performance."
            }
        }
    }

    pub fn exemption(self) -> Exemption {
        match self {
            Tier::NotApproved | Tier::Approved => Exemption::None,
            Tier::Level1 | Tier::Level2 | Tier::Level3 => Exemption::FinalReportOrSeminar,
        }
    }

    pub fn grade(self) -> f64 {
        match self {
            Tier::NotApproved | Tier::Approved => 0.0,
            Tier::Level1 => 4.5,
            Tier::Level2 => 4.7,
            Tier::Level3 => 5.0,
        }
    }

    pub fn scholarship_percent(self) -> u8 {
        match self {
            Tier::NotApproved | Tier::Approved | Tier::Level1 => 0,
            Tier::Level2 => 50,
            Tier::Level3 => 100,
        }
    }

    /// Tiers that carry benefits beyond a plain pass.
    pub fn grants_benefits(self) -> bool {
        self.exemption() != Exemption::None
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Graduation requirement waiver attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exemption {
    None,
    FinalReportOrSeminar,
}

impl Exemption {
    pub fn text(self) -> &'static str {
        match self {
            Exemption::None => "None",
            Exemption::FinalReportOrSeminar => {
                "Exemption from the final degree project report, or from taking Degree Seminar IV"
            }
        }
    }
}

impl fmt::Display for Exemption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl Serialize for Exemption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

/// Benefits granted for a classified score. Built fresh by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitClassification {
    pub tier: Tier,
    pub category: &'static str,
    pub description: &'static str,
    pub exemption: Exemption,
    pub grade: f64,
    pub scholarship_percent: u8,
}

impl BenefitClassification {
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            tier,
            category: tier.category(),
            description: tier.description(),
            exemption: tier.exemption(),
            grade: tier.grade(),
            scholarship_percent: tier.scholarship_percent(),
        }
    }
}

/// Result of running a score through the benefit ladder.
///
/// `Unclassified` is the explicit no-result case: a score that no rung of
/// the ladder accepts (241 under the reference policy).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "benefit", rename_all = "snake_case")]
pub enum BenefitOutcome {
    Classified(BenefitClassification),
    Unclassified,
}

impl BenefitOutcome {
    pub fn classification(&self) -> Option<&BenefitClassification> {
        match self {
            BenefitOutcome::Classified(c) => Some(c),
            BenefitOutcome::Unclassified => None,
        }
    }

    pub fn tier(&self) -> Option<Tier> {
        self.classification().map(|c| c.tier)
    }

    pub fn scholarship_percent(&self) -> u8 {
        self.classification().map_or(0, |c| c.scholarship_percent)
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, BenefitOutcome::Classified(_))
    }
}
