//! Typed record extraction from a normalized frame.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{DataFrame, DataType, PolarsResult, TimeUnit};

use roster_model::UserRecord;
use roster_model::columns::{
    AGE, COUNTRY, EMAIL, NAME, SIGNUP_DATE, SUBSCRIPTION_TIER, USER_ID,
};

fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let cast = column.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn timestamp_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let millis = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    Ok(millis
        .i64()?
        .into_iter()
        .map(|value| {
            value
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
        })
        .collect())
}

/// Read every row of a normalized frame as a [`UserRecord`], in row order.
///
/// Missing columns read as `None`. The frame is expected to have gone
/// through normalization, so `signup_date` is a timestamp column.
pub fn records_from_frame(df: &DataFrame) -> PolarsResult<Vec<UserRecord>> {
    let user_ids = f64_values(df, USER_ID)?;
    let names = text_values(df, NAME)?;
    let emails = text_values(df, EMAIL)?;
    let signup_dates = timestamp_values(df, SIGNUP_DATE)?;
    let countries = text_values(df, COUNTRY)?;
    let ages = f64_values(df, AGE)?;
    let tiers = text_values(df, SUBSCRIPTION_TIER)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(UserRecord {
            user_id: user_ids[idx],
            name: names[idx].clone(),
            email: emails[idx].clone(),
            signup_date: signup_dates[idx],
            country: countries[idx].clone(),
            age: ages[idx],
            subscription_tier: tiers[idx].clone(),
        });
    }
    Ok(records)
}
