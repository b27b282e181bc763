use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::itinerary::{Activity, Itinerary, DEFAULT_TIME};

/// Accepted time layouts, tried in order: 24-hour, then 12-hour.
///
/// chrono skips whitespace around numeric fields, so each layout is gated by
/// an anchored shape that rejects padded or oddly spaced input first.
static TIME_LAYOUTS: LazyLock<[(Regex, &str); 2]> = LazyLock::new(|| {
    [
        (
            Regex::new(r"^\d{1,2}:\d{1,2}$").expect("valid 24-hour pattern"),
            "%H:%M",
        ),
        (
            Regex::new(r"^\d{1,2}:\d{1,2}\s+[AaPp][Mm]$").expect("valid 12-hour pattern"),
            "%I:%M %p",
        ),
    ]
});

/// Ordering key for a display time. Unparseable input sorts as midnight.
pub fn sort_key(display: &str) -> NaiveTime {
    TIME_LAYOUTS
        .iter()
        .filter(|(shape, _)| shape.is_match(display))
        .find_map(|(_, format)| NaiveTime::parse_from_str(display, format).ok())
        .unwrap_or(NaiveTime::MIN)
}

/// Defaults missing times and orders one day by time of day.
///
/// The sort is stable so activities sharing a key keep their input order.
/// Keys live only in the scratch vector and never reach the activities.
pub fn normalize_day(activities: Vec<Activity>) -> Vec<Activity> {
    let mut keyed: Vec<(NaiveTime, Activity)> = activities
        .into_iter()
        .map(|mut activity| {
            let key = sort_key(activity.time.get_or_insert_with(|| DEFAULT_TIME.to_string()));
            (key, activity)
        })
        .collect();

    keyed.sort_by_key(|(key, _)| *key);

    keyed.into_iter().map(|(_, activity)| activity).collect()
}

pub fn normalize_itinerary(itinerary: Itinerary) -> Itinerary {
    itinerary
        .into_iter()
        .map(|(date, activities)| (date, normalize_day(activities)))
        .collect()
}
