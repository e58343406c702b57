//! Enumerated values accepted by the service and their membership predicates.
//!
//! The predicates are pure. The façade calls the `ensure_*` variants before
//! building a request so that bad input fails without a round trip.

use crate::error::ValidationError;

/// Monitor types that can be set through `type`.
pub const MONITOR_TYPES: [&str; 3] = ["RealBrowserUser", "VirtualUser", "dns"];

/// Browsers a script-based monitor can run in. `IE` is Enterprise only.
pub const BROWSER_TYPES: [&str; 3] = ["FF", "CHROME", "IE"];

/// Monitor run intervals, in minutes.
pub const UPDATE_INTERVALS: [u32; 10] = [1, 2, 3, 4, 5, 10, 15, 20, 30, 60];

/// Strikes before an alert policy fires.
pub const STRIKES: [u32; 3] = [1, 2, 3];

/// Aggregation periods for aggregate sample data.
pub const AGGREGATE_FREQUENCIES: [&str; 2] = ["day", "hour"];

/// Grouping keys for aggregate sample data.
pub const AGGREGATE_GROUP_BY: [&str; 2] = ["location", "step"];

/// Well-known monitoring location names, for [`valid_location`] and offline
/// checks. Not a gate on requests: the account's list comes from
/// [`crate::monitoring::Monitoring::locations`].
pub const LOCATIONS: [&str; 100] = [
    // North America
    "washingtondc",
    "newyork",
    "boston",
    "philadelphia",
    "atlanta",
    "miami",
    "chicago",
    "dallas",
    "houston",
    "austin",
    "denver",
    "phoenix",
    "saltlakecity",
    "lasvegas",
    "losangeles",
    "sandiego",
    "sanfrancisco",
    "sanjose",
    "seattle",
    "portland",
    "minneapolis",
    "stlouis",
    "kansascity",
    "detroit",
    "cleveland",
    "pittsburgh",
    "charlotte",
    "nashville",
    "neworleans",
    "tampa",
    "orlando",
    "honolulu",
    "anchorage",
    "toronto",
    "montreal",
    "vancouver",
    "calgary",
    "ottawa",
    "mexicocity",
    "monterrey",
    // South America
    "saopaulo",
    "riodejaneiro",
    "buenosaires",
    "santiago",
    "lima",
    "bogota",
    "caracas",
    // Europe
    "london",
    "manchester",
    "dublin",
    "amsterdam",
    "brussels",
    "paris",
    "marseille",
    "frankfurt",
    "berlin",
    "munich",
    "hamburg",
    "zurich",
    "vienna",
    "milan",
    "rome",
    "madrid",
    "barcelona",
    "lisbon",
    "stockholm",
    "oslo",
    "copenhagen",
    "helsinki",
    "warsaw",
    "prague",
    "budapest",
    "bucharest",
    "sofia",
    "athens",
    "istanbul",
    "kiev",
    "moscow",
    // Middle East & Africa
    "telaviv",
    "dubai",
    "riyadh",
    "cairo",
    "johannesburg",
    "capetown",
    "lagos",
    "nairobi",
    // Asia Pacific
    "mumbai",
    "chennai",
    "bangalore",
    "newdelhi",
    "singapore",
    "kualalumpur",
    "jakarta",
    "bangkok",
    "hongkong",
    "taipei",
    "seoul",
    "tokyo",
    "sydney",
    "auckland",
];

pub fn valid_monitor_type(monitor_type: &str) -> bool {
    MONITOR_TYPES.contains(&monitor_type)
}

pub fn valid_browser_type(browser_type: &str) -> bool {
    BROWSER_TYPES.contains(&browser_type)
}

pub fn valid_update_interval(interval: u32) -> bool {
    UPDATE_INTERVALS.contains(&interval)
}

pub fn valid_strikes(strikes: u32) -> bool {
    STRIKES.contains(&strikes)
}

pub fn valid_aggregate_frequency(frequency: &str) -> bool {
    AGGREGATE_FREQUENCIES.contains(&frequency)
}

pub fn valid_aggregate_group_by(group_by: &str) -> bool {
    AGGREGATE_GROUP_BY.contains(&group_by)
}

pub fn valid_location(location: &str) -> bool {
    LOCATIONS.contains(&location)
}

fn ensure<T: ToString>(
    ok: bool,
    field: &'static str,
    value: T,
    allowed: &[impl ToString],
) -> Result<(), ValidationError> {
    if ok {
        return Ok(());
    }
    let allowed = allowed
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationError::new(field, value, allowed))
}

pub(crate) fn ensure_monitor_type(value: &str) -> Result<(), ValidationError> {
    ensure(valid_monitor_type(value), "monitor type", value, &MONITOR_TYPES)
}

pub(crate) fn ensure_browser_type(value: &str) -> Result<(), ValidationError> {
    ensure(valid_browser_type(value), "browser", value, &BROWSER_TYPES)
}

pub(crate) fn ensure_update_interval(value: u32) -> Result<(), ValidationError> {
    ensure(
        valid_update_interval(value),
        "interval",
        value,
        &UPDATE_INTERVALS,
    )
}

pub(crate) fn ensure_strikes(value: u32) -> Result<(), ValidationError> {
    ensure(valid_strikes(value), "strikes", value, &STRIKES)
}

pub(crate) fn ensure_aggregate_frequency(value: &str) -> Result<(), ValidationError> {
    ensure(
        valid_aggregate_frequency(value),
        "frequency",
        value,
        &AGGREGATE_FREQUENCIES,
    )
}

pub(crate) fn ensure_aggregate_group_by(value: &str) -> Result<(), ValidationError> {
    ensure(
        valid_aggregate_group_by(value),
        "groupBy",
        value,
        &AGGREGATE_GROUP_BY,
    )
}

fn location_names(csv: &str) -> impl Iterator<Item = &str> {
    csv.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// A comma-separated location list must name at least one location. Blank
/// entries are ignored; names are left for the service to judge.
pub(crate) fn ensure_locations(csv: &str) -> Result<(), ValidationError> {
    if location_names(csv).next().is_none() {
        return Err(ValidationError::new(
            "locations",
            csv,
            "one or more comma-separated location names",
        ));
    }
    Ok(())
}

/// Check every name of a comma-separated location list against `known`,
/// typically the answer of [`crate::monitoring::Monitoring::locations`].
pub fn ensure_known_locations<S: AsRef<str>>(
    csv: &str,
    known: &[S],
) -> Result<(), ValidationError> {
    ensure_locations(csv)?;
    for location in location_names(csv) {
        if !known.iter().any(|k| k.as_ref() == location) {
            return Err(ValidationError::new(
                "location",
                location,
                "a location returned by the locations call",
            ));
        }
    }
    Ok(())
}
