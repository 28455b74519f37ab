use super::models::{TimeOfDay, WeekdayTag, END_OF_DAY};
use super::query::{QueryOutcome, QueryParams};
use super::time::{format_time_of_day, parse_clock_time};
use miette::Diagnostic;
use rust_i18n::t;
use thiserror::Error;

// Flags understood by `findroom`
pub mod flags {
    pub const VERBOSE: [&str; 3] = ["--v", "verbose", "all"];
    pub const TIME: &str = "--t";
    pub const DAY: &str = "--d";
}

/// Problems with the arguments a user typed
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FindRoomArgsError {
    #[error("Invalid time '{0}'")]
    #[diagnostic(code(roomfinder::args::time))]
    InvalidTime(String),

    #[error("Invalid day '{0}'")]
    #[diagnostic(code(roomfinder::args::day))]
    InvalidDay(String),

    #[error("Missing value after {0}")]
    #[diagnostic(code(roomfinder::args::missing_value))]
    MissingValue(&'static str),
}

/// A parsed `findroom` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindRoomRequest {
    pub filter: Option<String>,
    pub verbose: bool,
    pub time: Option<TimeOfDay>,
    pub day: Option<WeekdayTag>,
}

impl FindRoomRequest {
    /// Parse `[filter] [--v|verbose|all] [--t TIME] [--d DAY]` in any order.
    ///
    /// The first word that is neither a flag nor a flag value is the filter.
    pub fn parse<'a>(
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, FindRoomArgsError> {
        let mut request = Self::default();
        let mut tokens = tokens.into_iter().map(str::trim).filter(|t| !t.is_empty());

        while let Some(token) = tokens.next() {
            if flags::VERBOSE.contains(&token) {
                request.verbose = true;
            } else if token == flags::TIME {
                let value = tokens.next().ok_or(FindRoomArgsError::MissingValue(flags::TIME))?;
                let time = parse_clock_time(value)
                    .map_err(|_| FindRoomArgsError::InvalidTime(value.to_string()))?;
                request.time = Some(time);
            } else if token == flags::DAY {
                let value = tokens.next().ok_or(FindRoomArgsError::MissingValue(flags::DAY))?;
                let day = WeekdayTag::parse_loose(value)
                    .ok_or_else(|| FindRoomArgsError::InvalidDay(value.to_string()))?;
                request.day = Some(day);
            } else if request.filter.is_none() {
                request.filter = Some(token.to_string());
            }
        }

        Ok(request)
    }

    /// True when the user moved the query away from "now"
    pub fn has_overrides(&self) -> bool {
        self.time.is_some() || self.day.is_some()
    }

    /// Query parameters, filling unset day/time from the current moment
    pub fn to_params(&self, now_day: WeekdayTag, now_time: TimeOfDay) -> QueryParams {
        QueryParams::new(self.day.unwrap_or(now_day), self.time.unwrap_or(now_time))
            .with_filter(self.filter.clone())
    }
}

/// `1:15pm`, or the end-of-day wording for the sentinel
pub fn format_until(time: TimeOfDay) -> String {
    if time == END_OF_DAY {
        t!("rooms_end_of_day").to_string()
    } else {
        format_time_of_day(time)
    }
}

/// Build the reply text for a query
pub fn render_reply(
    outcome: &QueryOutcome,
    request: &FindRoomRequest,
    params: &QueryParams,
) -> String {
    let result = match outcome {
        QueryOutcome::Found(result) => result,
        QueryOutcome::NoMatch { filter: Some(filter) } => {
            return t!("rooms_none_matching", filter = filter).to_string();
        }
        QueryOutcome::NoMatch { filter: None } => return t!("rooms_none_open").to_string(),
    };

    let mut reply = t!("rooms_best_title", until = format_until(result.best_until)).to_string();
    reply.push('\n');
    for location in &result.best {
        reply.push_str(&format!("**{}**\n", location));
    }

    if request.verbose {
        reply.push('\n');
        reply.push_str(&t!("rooms_all_open_title"));
        reply.push('\n');
        for room in &result.all_open {
            reply.push_str(&format!(
                "{} until __{}__\n",
                room.location,
                format_until(room.open_until)
            ));
        }
    }

    if request.has_overrides() {
        reply.push('\n');
        reply.push_str(&t!(
            "rooms_filtered_by",
            day = params.day.as_str(),
            time = params.instant.to_string()
        ));
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::room_finder::query::{OpenRoom, QueryResult};

    #[test]
    fn test_parse_plain_filter() {
        let request = FindRoomRequest::parse(["LA5"]).unwrap();
        assert_eq!(request.filter.as_deref(), Some("LA5"));
        assert!(!request.verbose);
        assert!(!request.has_overrides());

        assert_eq!(FindRoomRequest::parse(Vec::<&str>::new()).unwrap(), FindRoomRequest::default());
    }

    #[test]
    fn test_parse_flags() {
        let request = FindRoomRequest::parse("VEC --v --t 1430 --d th".split_whitespace()).unwrap();
        assert_eq!(
            request,
            FindRoomRequest {
                filter: Some("VEC".into()),
                verbose: true,
                time: Some(1430),
                day: Some(WeekdayTag::Th),
            }
        );

        let request = FindRoomRequest::parse("all --t 2:30pm".split_whitespace()).unwrap();
        assert!(request.verbose);
        assert_eq!(request.filter, None);
        assert_eq!(request.time, Some(1430));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FindRoomRequest::parse("--t 2575".split_whitespace()),
            Err(FindRoomArgsError::InvalidTime("2575".into()))
        );
        assert_eq!(
            FindRoomRequest::parse("--d Thursday".split_whitespace()),
            Err(FindRoomArgsError::InvalidDay("Thursday".into()))
        );
        assert_eq!(
            FindRoomRequest::parse(["LA5", "--d"]),
            Err(FindRoomArgsError::MissingValue("--d"))
        );
    }

    #[test]
    fn test_to_params_uses_now_for_missing_overrides() {
        let request = FindRoomRequest {
            day: Some(WeekdayTag::F),
            ..Default::default()
        };
        let params = request.to_params(WeekdayTag::M, 930);
        assert_eq!(params, QueryParams::new(WeekdayTag::F, 930));
    }

    #[test]
    fn test_render_reply() {
        let outcome = QueryOutcome::Found(QueryResult {
            best: vec!["VEC-115".into()],
            best_until: END_OF_DAY,
            all_open: vec![
                OpenRoom { location: "LA5-146".into(), open_until: 1315 },
                OpenRoom { location: "VEC-115".into(), open_until: END_OF_DAY },
            ],
        });
        let request = FindRoomRequest {
            verbose: true,
            time: Some(1000),
            ..Default::default()
        };
        let params = request.to_params(WeekdayTag::W, 800);

        let reply = render_reply(&outcome, &request, &params);
        assert!(reply.contains("**VEC-115**"));
        assert!(reply.contains("LA5-146 until __1:15pm__"));
        assert!(reply.contains("--d W --t 1000"));

        let terse = render_reply(&outcome, &FindRoomRequest::default(), &params);
        assert!(!terse.contains("LA5-146"));
        assert!(!terse.contains("--d"));
    }

    #[test]
    fn test_footer_can_be_pasted_back() {
        let request = FindRoomRequest::parse("--d tu --t 12:30".split_whitespace()).unwrap();
        let params = request.to_params(WeekdayTag::M, 800);
        let outcome = QueryOutcome::Found(QueryResult {
            best: vec!["VEC-115".into()],
            best_until: END_OF_DAY,
            all_open: vec![OpenRoom { location: "VEC-115".into(), open_until: END_OF_DAY }],
        });
        let reply = render_reply(&outcome, &request, &params);
        assert!(reply.contains("--d Tu --t 1230"));

        let echoed = FindRoomRequest::parse("--d Tu --t 1230".split_whitespace()).unwrap();
        assert_eq!(echoed.to_params(WeekdayTag::M, 800), params);
    }

    #[test]
    fn test_render_no_match() {
        let params = QueryParams::new(WeekdayTag::M, 1000);
        let outcome = QueryOutcome::NoMatch { filter: Some("HC".into()) };
        let reply = render_reply(&outcome, &FindRoomRequest::default(), &params);
        assert!(reply.contains("HC"));
    }
}
