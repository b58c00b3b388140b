//! Password strength scoring.

use std::any::{Any, TypeId};

use egui::Color32;
use taskflow_states::{Compute, ComputeDeps, Dep, Updater, assign_impl};

use crate::SignupForm;
use crate::validation::MIN_PASSWORD_LEN;

/// Punctuation accepted as a "special character".
pub const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?`~"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthTier {
    #[default]
    Weak,
    Medium,
    Strong,
}

impl StrengthTier {
    pub fn from_passed(passed: usize) -> Self {
        match passed {
            0..=2 => Self::Weak,
            3 => Self::Medium,
            _ => Self::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Self::Weak => Color32::from_rgb(0xEF, 0x44, 0x44),
            Self::Medium => Color32::from_rgb(0xF5, 0x9E, 0x0B),
            Self::Strong => Color32::from_rgb(0x22, 0xC5, 0x5E),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordChecks {
    pub min_length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordChecks {
    pub fn passed(&self) -> usize {
        [
            self.min_length,
            self.uppercase,
            self.lowercase,
            self.digit,
            self.special,
        ]
        .into_iter()
        .filter(|passed| *passed)
        .count()
    }

    /// `(label, passed)` pairs in display order.
    pub fn items(&self) -> [(&'static str, bool); 5] {
        [
            ("At least 8 characters", self.min_length),
            ("One uppercase letter", self.uppercase),
            ("One lowercase letter", self.lowercase),
            ("One number", self.digit),
            ("One special character", self.special),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub tier: StrengthTier,
    pub checks: PasswordChecks,
}

impl PasswordStrength {
    pub fn passed(&self) -> usize {
        self.checks.passed()
    }

    /// Meter fill, 20 per passed check.
    pub fn percent(&self) -> u8 {
        // At most 5 checks, so this never exceeds 100.
        (self.passed() * 20) as u8
    }
}

/// Letter checks follow Unicode case; the digit check only counts ASCII `0-9`.
pub fn score(password: &str) -> PasswordStrength {
    let checks = PasswordChecks {
        min_length: password.chars().count() >= MIN_PASSWORD_LEN,
        uppercase: password.chars().any(char::is_uppercase),
        lowercase: password.chars().any(char::is_lowercase),
        digit: password.chars().any(|c| c.is_ascii_digit()),
        special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    };

    PasswordStrength {
        tier: StrengthTier::from_passed(checks.passed()),
        checks,
    }
}

/// Strength of the signup form's current password. `None` while the password is empty.
#[derive(Debug, Clone, Default)]
pub struct PasswordStrengthCompute {
    pub strength: Option<PasswordStrength>,
}

impl Compute for PasswordStrengthCompute {
    fn deps(&self) -> ComputeDeps {
        (vec![TypeId::of::<SignupForm>()], Vec::new())
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let form = deps.state::<SignupForm>();
        let strength = (!form.password.is_empty()).then(|| score(&form.password));
        updater.set(Self { strength });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_bucket_passed_checks() {
        assert_eq!(score("").tier, StrengthTier::Weak);
        assert_eq!(score("abc").tier, StrengthTier::Weak);
        // lower + upper + digit
        assert_eq!(score("aB1").tier, StrengthTier::Medium);
        // length + lower + upper + digit
        assert_eq!(score("abcdefG1").tier, StrengthTier::Strong);
        assert_eq!(score("abcdefG1!").passed(), 5);
    }

    #[test]
    fn letter_classes_are_unicode_aware() {
        let checks = score("Élan").checks;
        assert!(checks.uppercase && checks.lowercase);

        let checks = score("ÇA").checks;
        assert!(checks.uppercase && !checks.lowercase);

        // Non-ASCII digits do not count.
        assert!(!score("٣").checks.digit);
    }

    #[test]
    fn each_check_is_independent() {
        let checks = score("!").checks;
        assert_eq!(
            checks,
            PasswordChecks {
                special: true,
                ..Default::default()
            }
        );

        let checks = score("12345678").checks;
        assert!(checks.min_length && checks.digit);
        assert!(!checks.uppercase && !checks.lowercase && !checks.special);
    }

    #[test]
    fn every_listed_special_char_counts() {
        for c in SPECIAL_CHARS.chars() {
            assert!(score(&c.to_string()).checks.special, "{c} should count");
        }
        assert!(!score("é").checks.special);
    }

    #[test]
    fn tier_never_decreases_with_more_checks() {
        let samples = [
            "", "a", "aA", "aA1", "aA1!", "aA1!aaaa", "ZZZZZZZZ", "zz!!", "Password1",
            "P@ssw0rd!", "        ",
        ];
        let mut scored: Vec<_> = samples.iter().map(|p| score(p)).collect();
        scored.sort_by_key(PasswordStrength::passed);

        for pair in scored.windows(2) {
            assert!(pair[0].tier <= pair[1].tier, "{pair:?}");
        }
    }

    #[test]
    fn percent_and_labels() {
        let strong = score("P@ssw0rd!");
        assert_eq!(strong.percent(), 100);
        assert_eq!(strong.tier.label(), "Strong");
        assert_eq!(score("aB1").percent(), 60);
        assert_eq!(StrengthTier::Weak.label(), "Weak");
        assert_ne!(StrengthTier::Weak.color(), StrengthTier::Strong.color());
    }
}
