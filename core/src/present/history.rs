use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

use crate::model::Dataset;

/// Human age of an upload relative to `now`, rendered in `now`'s time zone.
pub fn relative_age<Tz>(uploaded_at: DateTime<Utc>, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = uploaded_at.with_timezone(&now.timezone());
    let elapsed = now.clone().signed_duration_since(local.clone());
    if elapsed.num_seconds() < 60 {
        return "Just now".to_string();
    }

    let days = elapsed.num_days();
    let clock = local.format("%-I:%M %p");
    match days {
        0 if elapsed.num_hours() == 0 => format!("{} min ago", elapsed.num_minutes()),
        0 => format!("Today, {clock}"),
        1 => format!("Yesterday, {clock}"),
        2..=6 => format!("{days} days ago"),
        _ => local.format("%b %-d, %Y").to_string(),
    }
}

/// One sidebar entry: filename, item count and age.
pub fn history_line<Tz>(dataset: &Dataset, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} · {} items · {}",
        dataset.filename,
        dataset.item_count(),
        relative_age(dataset.uploaded_at, now)
    )
}
