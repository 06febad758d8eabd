//! Query-parameter form of the filter state, so filtered views stay
//! shareable and survive back-navigation.

use once_cell::sync::Lazy;
use time::format_description::{self, FormatItem};
use time::Date;

use super::{DateRange, FilterState};

const PARAM_SEARCH: &str = "search";
const PARAM_START_DATE: &str = "startDate";
const PARAM_END_DATE: &str = "endDate";
const PARAM_AUTHOR: &str = "author";

static DAY_FORMAT: Lazy<Vec<FormatItem<'static>>> = Lazy::new(|| {
    format_description::parse("[year]-[month]-[day]").expect("valid date format description")
});

/// Serializes the active filters as query pairs, omitting anything unset.
pub fn to_query_pairs(state: &FilterState) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if !state.search.is_empty() {
        pairs.push((PARAM_SEARCH.to_string(), state.search.clone()));
    }
    if let Some(start) = state.date_range.start {
        if let Ok(formatted) = start.format(&*DAY_FORMAT) {
            pairs.push((PARAM_START_DATE.to_string(), formatted));
        }
    }
    if let Some(end) = state.date_range.end {
        if let Ok(formatted) = end.format(&*DAY_FORMAT) {
            pairs.push((PARAM_END_DATE.to_string(), formatted));
        }
    }
    if let Some(author) = &state.author_id {
        pairs.push((PARAM_AUTHOR.to_string(), author.clone()));
    }
    pairs
}

/// Rebuilds filter state from URL query pairs. Unknown keys are ignored and
/// unparseable dates are dropped rather than failing the whole page.
pub fn from_query_pairs<'a, I>(pairs: I) -> FilterState
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut state = FilterState::default();
    for (key, value) in pairs {
        match key {
            PARAM_SEARCH => state.search = value.to_string(),
            PARAM_START_DATE => state.date_range.start = parse_day(value),
            PARAM_END_DATE => state.date_range.end = parse_day(value),
            PARAM_AUTHOR if !value.is_empty() => state.author_id = Some(value.to_string()),
            _ => {}
        }
    }
    state
}

fn parse_day(value: &str) -> Option<Date> {
    match Date::parse(value, &*DAY_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::debug!(%value, %err, "ignoring unparseable date query parameter");
            None
        }
    }
}
