use super::models::{TimeOfDay, WeekdayTag};
use super::registry::Registry;

/// What the caller is asking: which rooms are free on `day` at `instant`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub day: WeekdayTag,
    pub instant: TimeOfDay,
    /// Case-insensitive substring of the location
    pub filter: Option<String>,
}

impl QueryParams {
    pub fn new(day: WeekdayTag, instant: TimeOfDay) -> Self {
        Self {
            day,
            instant,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }
}

/// A free room and the time its next booking starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRoom {
    pub location: String,
    pub open_until: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Every room that stays free the longest, in registry order
    pub best: Vec<String>,
    pub best_until: TimeOfDay,
    /// Every free room, in registry order
    pub all_open: Vec<OpenRoom>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Found(QueryResult),
    /// Nothing is free; `filter` is the filter that was active, if any
    NoMatch { filter: Option<String> },
}

/// Find the free rooms for `params` and pick the ones free the longest.
///
/// Ties are not broken: every room sharing the latest `open_until` is best.
pub fn query(registry: &Registry, params: &QueryParams) -> QueryOutcome {
    let filter = params
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|filter| !filter.is_empty());
    let needle = filter.map(str::to_lowercase);

    let all_open: Vec<OpenRoom> = registry
        .rooms()
        .iter()
        .filter(|room| room.is_open(params.day, params.instant))
        .filter(|room| match &needle {
            Some(needle) => room.location.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .map(|room| OpenRoom {
            location: room.location.clone(),
            open_until: room.next_booking_start(params.day, params.instant),
        })
        .collect();

    let Some(best_until) = all_open.iter().map(|room| room.open_until).max() else {
        return QueryOutcome::NoMatch {
            filter: filter.map(str::to_string),
        };
    };

    let best = all_open
        .iter()
        .filter(|room| room.open_until == best_until)
        .map(|room| room.location.clone())
        .collect();

    QueryOutcome::Found(QueryResult {
        best,
        best_until,
        all_open,
    })
}
