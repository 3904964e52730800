//! Column contract for user roster files.

use std::collections::BTreeSet;

pub const USER_ID: &str = "user_id";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const SIGNUP_DATE: &str = "signup_date";
pub const COUNTRY: &str = "country";
pub const AGE: &str = "age";
pub const SUBSCRIPTION_TIER: &str = "subscription_tier";

/// Columns every input table must carry after name canonicalization.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    USER_ID,
    NAME,
    EMAIL,
    SIGNUP_DATE,
    COUNTRY,
    AGE,
    SUBSCRIPTION_TIER,
];

/// Subscription tiers accepted by the row validator (already lowercased).
pub const VALID_TIERS: [&str; 4] = ["free", "basic", "premium", "enterprise"];

/// Text columns trimmed during normalization.
pub const TEXT_COLUMNS: [&str; 4] = [NAME, EMAIL, COUNTRY, SUBSCRIPTION_TIER];

/// Business key used to collapse duplicate records.
pub const BUSINESS_KEY: &str = USER_ID;

/// The required column set, for set-difference checks.
pub fn required_columns() -> BTreeSet<&'static str> {
    REQUIRED_COLUMNS.into_iter().collect()
}

/// Returns true if `tier` is one of the accepted subscription tiers.
pub fn is_valid_tier(tier: &str) -> bool {
    VALID_TIERS.contains(&tier)
}
