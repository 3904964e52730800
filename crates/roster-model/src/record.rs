//! Typed view of one normalized row.

use chrono::NaiveDateTime;

/// A user row after normalization, with every field explicitly optional.
///
/// Numeric fields are `None` when the source value could not be coerced;
/// the row validator decides what that means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub user_id: Option<f64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub signup_date: Option<NaiveDateTime>,
    pub country: Option<String>,
    pub age: Option<f64>,
    pub subscription_tier: Option<String>,
}

impl UserRecord {
    /// Age converted to an integer by truncation toward zero.
    ///
    /// Returns `None` for missing or non-finite ages.
    pub fn age_as_integer(&self) -> Option<i64> {
        let age = self.age?;
        if !age.is_finite() {
            return None;
        }
        Some(age.trunc() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_truncates_toward_zero() {
        let record = UserRecord {
            age: Some(29.7),
            ..UserRecord::default()
        };
        assert_eq!(record.age_as_integer(), Some(29));

        let record = UserRecord {
            age: Some(0.5),
            ..UserRecord::default()
        };
        assert_eq!(record.age_as_integer(), Some(0));
    }

    #[test]
    fn missing_age_has_no_integer() {
        assert_eq!(UserRecord::default().age_as_integer(), None);
    }
}
