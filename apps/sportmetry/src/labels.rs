//! # Presentation Labels
//!
//! The core only emits language-neutral category tags. This module maps
//! each tag to its Hungarian or English display text.

use serde::{Deserialize, Serialize};
use sportmetry_core::{
    BmiCategory, FearAvoidanceLevel, MotivationLevel, MotivationScale, PhvCategory, Sex,
    SignificanceTier, SomatotypeClass, SomatotypeComponent, SomatotypeTier, SportmetryError,
};

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Hu,
    En,
}

impl std::str::FromStr for Lang {
    type Err = SportmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hu" => Ok(Lang::Hu),
            "en" => Ok(Lang::En),
            other => Err(SportmetryError::DeserializationError(format!(
                "Unknown language: {}. Use: hu, en",
                other
            ))),
        }
    }
}

/// A value with a localized display text.
pub trait Label {
    fn label(&self, lang: Lang) -> &'static str;
}

/// Pick the text of the requested language.
fn pick(lang: Lang, hu: &'static str, en: &'static str) -> &'static str {
    match lang {
        Lang::Hu => hu,
        Lang::En => en,
    }
}

impl Label for Sex {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            Sex::Boy => pick(lang, "fiú", "boy"),
            Sex::Girl => pick(lang, "lány", "girl"),
        }
    }
}

impl Label for BmiCategory {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            BmiCategory::SevereThinness => pick(lang, "súlyos soványság", "severe thinness"),
            BmiCategory::ModerateThinness => pick(lang, "mérsékelt soványság", "moderate thinness"),
            BmiCategory::MildThinness => pick(lang, "enyhe soványság", "mild thinness"),
            BmiCategory::Normal => pick(lang, "normális testsúly", "normal weight"),
            BmiCategory::Overweight => pick(lang, "túlsúlyos", "overweight"),
        }
    }
}

impl Label for PhvCategory {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            PhvCategory::High => pick(lang, "magas", "high"),
            PhvCategory::Normal => pick(lang, "normál", "normal"),
            PhvCategory::Low => pick(lang, "alacsony", "low"),
            PhvCategory::Undefined => pick(lang, "ismeretlen", "unknown"),
        }
    }
}

impl Label for SomatotypeClass {
    fn label(&self, lang: Lang) -> &'static str {
        use SomatotypeComponent::*;
        use SomatotypeTier::*;
        match (self.component, self.tier) {
            (Endomorphy, High) => pick(
                lang,
                "hízásra hajlamos testalkat",
                "high propensity to gain fat",
            ),
            (Endomorphy, Moderate) => pick(
                lang,
                "hízásra közepes mértékben hajlamos testalkat",
                "moderate propensity to gain fat",
            ),
            (Endomorphy, Low) => pick(
                lang,
                "hízásra nem hajlamos testalkat",
                "low propensity to gain fat",
            ),
            (Mesomorphy, High) => pick(
                lang,
                "nagy mértékben fejleszthető izomzat",
                "high muscular development potential",
            ),
            (Mesomorphy, Moderate) => pick(
                lang,
                "közepes mértékben fejleszthető izomzat",
                "moderate muscular development potential",
            ),
            (Mesomorphy, Low) => pick(
                lang,
                "kis mértékben fejleszthető izomzat",
                "low muscular development potential",
            ),
            (Ectomorphy, High) => pick(lang, "kifejezetten nyúlánk alkat", "high linearity"),
            (Ectomorphy, Moderate) => pick(lang, "közepesen nyúlánk alkat", "moderate linearity"),
            (Ectomorphy, Low) => pick(lang, "alacsony fokú relatív nyúlánkság", "low linearity"),
        }
    }
}

impl Label for FearAvoidanceLevel {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            FearAvoidanceLevel::Low => pick(
                lang,
                "Alacsony szintű félelem jellemző",
                "Low level of fear",
            ),
            FearAvoidanceLevel::Moderate => pick(
                lang,
                "Közepes mértékű félelem jellemző",
                "Moderate level of fear",
            ),
            FearAvoidanceLevel::High => pick(
                lang,
                "Magas szintű félelem jellemző",
                "High level of fear",
            ),
        }
    }
}

impl Label for MotivationScale {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            MotivationScale::IntrinsicKnowledge => pick(lang, "Belső tudás", "Intrinsic knowledge"),
            MotivationScale::IntrinsicAccomplishment => {
                pick(lang, "Belső tökéletesség", "Intrinsic accomplishment")
            }
            MotivationScale::IntrinsicStimulation => {
                pick(lang, "Belső öröm", "Intrinsic stimulation")
            }
            MotivationScale::Introjected => pick(lang, "Introjektált", "Introjected"),
            MotivationScale::Extrinsic => pick(lang, "Külső", "Extrinsic"),
            MotivationScale::Amotivation => pick(lang, "Amotiváció", "Amotivation"),
        }
    }
}

impl Label for MotivationLevel {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            MotivationLevel::Strong => pick(lang, "erősen jellemző", "strongly characteristic"),
            MotivationLevel::Moderate => {
                pick(lang, "mérsékelten jellemző", "moderately characteristic")
            }
            MotivationLevel::Weak => pick(lang, "kevésbé jellemző", "less characteristic"),
        }
    }
}

impl Label for SignificanceTier {
    fn label(&self, lang: Lang) -> &'static str {
        match self {
            SignificanceTier::Primary => pick(lang, "kiemelt", "primary"),
            SignificanceTier::Secondary => pick(lang, "másodlagos", "secondary"),
            SignificanceTier::Peripheral => pick(lang, "peremhelyzetű", "peripheral"),
        }
    }
}

/// Readiness verdict of an I-PRRS total.
#[must_use]
pub fn readiness_label(ready: bool, lang: Lang) -> &'static str {
    if ready {
        pick(lang, "Kész a visszatérésre", "Ready to return")
    } else {
        pick(lang, "Még nem áll készen", "Not yet ready")
    }
}

/// Label of an optional category, empty when the value was not computable.
#[must_use]
pub fn optional_label<L: Label>(value: Option<&L>, lang: Lang) -> &'static str {
    value.map_or("", |v| v.label(lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_parses_case_insensitively() {
        assert_eq!(" EN ".parse::<Lang>().expect("en"), Lang::En);
        assert_eq!("hu".parse::<Lang>().expect("hu"), Lang::Hu);
        assert!("de".parse::<Lang>().is_err());
    }

    #[test]
    fn every_somatotype_class_has_distinct_labels() {
        let mut seen = std::collections::BTreeSet::new();
        for component in [
            SomatotypeComponent::Endomorphy,
            SomatotypeComponent::Mesomorphy,
            SomatotypeComponent::Ectomorphy,
        ] {
            for tier in [SomatotypeTier::Low, SomatotypeTier::Moderate, SomatotypeTier::High] {
                let class = SomatotypeClass { component, tier };
                assert!(seen.insert(class.label(Lang::Hu)));
                assert!(seen.insert(class.label(Lang::En)));
            }
        }
        assert_eq!(seen.len(), 18);
    }

    #[test]
    fn optional_category_renders_empty() {
        assert_eq!(optional_label::<BmiCategory>(None, Lang::En), "");
        assert_eq!(
            optional_label(Some(&BmiCategory::Overweight), Lang::Hu),
            "túlsúlyos"
        );
        assert_eq!(PhvCategory::Undefined.label(Lang::En), "unknown");
    }
}
