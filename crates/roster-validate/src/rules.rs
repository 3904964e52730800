//! Row-level business rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use roster_model::UserRecord;
use roster_model::columns::is_valid_tier;

/// Basic email shape. Deliberately simple; does not cover every RFC case.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("Invalid email regex")
});

/// A business rule a row can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowRule {
    /// `user_id` is null.
    MissingUserId,
    /// `email` is null or does not look like an address.
    InvalidEmail,
    /// `signup_date` is null.
    MissingSignupDate,
    /// `age` is null or not greater than zero as an integer.
    NonPositiveAge,
    /// `subscription_tier` is not one of the accepted tiers.
    UnknownTier,
}

impl RowRule {
    pub const ALL: [RowRule; 5] = [
        Self::MissingUserId,
        Self::InvalidEmail,
        Self::MissingSignupDate,
        Self::NonPositiveAge,
        Self::UnknownTier,
    ];

    /// Stable snake_case identifier used in logs and summaries.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingUserId => "missing_user_id",
            Self::InvalidEmail => "invalid_email",
            Self::MissingSignupDate => "missing_signup_date",
            Self::NonPositiveAge => "non_positive_age",
            Self::UnknownTier => "unknown_tier",
        }
    }

    fn holds(self, record: &UserRecord) -> bool {
        match self {
            Self::MissingUserId => record.user_id.is_some(),
            Self::InvalidEmail => record.email.as_deref().is_some_and(is_valid_email),
            Self::MissingSignupDate => record.signup_date.is_some(),
            Self::NonPositiveAge => record.age_as_integer().is_some_and(|age| age > 0),
            Self::UnknownTier => record.subscription_tier.as_deref().is_some_and(is_valid_tier),
        }
    }
}

impl fmt::Display for RowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returns true if `email` matches the basic address pattern.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Every rule `record` violates, in rule order. Empty means accepted.
pub fn check_row(record: &UserRecord) -> Vec<RowRule> {
    RowRule::ALL
        .into_iter()
        .filter(|rule| !rule.holds(record))
        .collect()
}

/// Returns true if `record` satisfies every rule.
pub fn is_valid_row(record: &UserRecord) -> bool {
    RowRule::ALL.into_iter().all(|rule| rule.holds(record))
}
