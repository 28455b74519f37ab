use super::models::{SectionSlot, WeekdayTag};
use super::time::{is_unscheduled, normalize_range};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};

// Column names in the section tables
pub mod columns {
    pub const LOCATION: &str = "LOCATION";
    pub const DAYS: &str = "DAYS";
    pub const TIME: &str = "TIME";
}

lazy_static! {
    static ref SUBJECT_LINK: Selector = Selector::parse("div.indexList a").expect("valid selector");
    static ref COURSE_HEADER: Selector = Selector::parse("div.courseHeader").expect("valid selector");
    static ref HEADER_CELL: Selector = Selector::parse("th[scope=\"col\"]").expect("valid selector");
    static ref ROW: Selector = Selector::parse("tr").expect("valid selector");
    static ref CELL: Selector = Selector::parse("th, td").expect("valid selector");
}

/// A section table as text: one header row and the rows beneath it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SectionTable {
    /// Key every row by the header names. Cells past the header width are dropped.
    pub fn sections(&self) -> impl Iterator<Item = HashMap<&str, &str>> + '_ {
        self.rows.iter().map(|row| {
            self.headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.as_str(), cell.as_str()))
                .collect()
        })
    }
}

/// Split a day pattern at each uppercase letter: `TuTh` gives `["Tu", "Th"]`
pub fn parse_days(days: &str) -> Vec<&str> {
    let starts: Vec<usize> = days
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(index, _)| index)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(days.len());
            &days[start..end]
        })
        .collect()
}

/// Flatten a section table into one slot per (section, meeting day)
pub fn extract(table: &SectionTable) -> Vec<SectionSlot> {
    let mut slots = Vec::new();

    for section in table.sections() {
        let (Some(location), Some(days), Some(time)) = (
            section.get(columns::LOCATION),
            section.get(columns::DAYS),
            section.get(columns::TIME),
        ) else {
            debug!("Skipping section without location, days or time: {:?}", section);
            continue;
        };

        if is_unscheduled(days) {
            continue;
        }

        let interval = match normalize_range(time) {
            Ok(interval) => interval,
            Err(e) => {
                warn!("Skipping section in {} with unreadable time: {}", location, e);
                continue;
            }
        };

        for token in parse_days(days) {
            match token.parse::<WeekdayTag>() {
                Ok(day) => slots.push(SectionSlot {
                    location: location.to_string(),
                    day,
                    interval,
                }),
                Err(e) => debug!("Skipping day token in {}: {}", location, e),
            }
        }
    }

    slots
}

/// Subject page links from the schedule index, in page order
pub fn subject_links(index_html: &str) -> Vec<String> {
    let document = Html::parse_document(index_html);

    document
        .select(&SUBJECT_LINK)
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| *href != "#")
        .map(str::to_string)
        .collect()
}

/// Every section table on a subject page.
///
/// A table belongs to a course when it is the next `table` sibling of a
/// `div` whose only class is `courseHeader`.
pub fn section_tables(subject_html: &str) -> Vec<SectionTable> {
    let document = Html::parse_document(subject_html);

    document
        .select(&COURSE_HEADER)
        .filter(|header| header.value().classes().count() == 1)
        .filter_map(|header| {
            header
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| sibling.value().name() == "table")
        })
        .map(read_table)
        .collect()
}

/// All slots on one subject page
pub fn extract_page(subject_html: &str) -> Vec<SectionSlot> {
    section_tables(subject_html)
        .iter()
        .flat_map(extract)
        .collect()
}

fn read_table(table: ElementRef<'_>) -> SectionTable {
    let headers = table.select(&HEADER_CELL).map(cell_text).collect();
    let rows = table
        .select(&ROW)
        .skip(1)
        .map(|row| row.select(&CELL).map(cell_text).collect())
        .collect();

    SectionTable { headers, rows }
}

/// Cell text with every fragment trimmed and glued back together
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::room_finder::models::Interval;

    fn table(rows: &[[&str; 4]]) -> SectionTable {
        SectionTable {
            headers: ["SEC.", "DAYS", "TIME", "LOCATION"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("MWF"), vec!["M", "W", "F"]);
        assert_eq!(parse_days("TuTh"), vec!["Tu", "Th"]);
        assert_eq!(parse_days("MTuWThF"), vec!["M", "Tu", "W", "Th", "F"]);
        assert_eq!(parse_days("SaSu"), vec!["Sa", "Su"]);
        assert!(parse_days("").is_empty());
        // Leading lowercase text has no day to attach to
        assert_eq!(parse_days("xTu"), vec!["Tu"]);
    }

    #[test]
    fn test_extract_one_slot_per_day() {
        let slots = extract(&table(&[["01", "MWF", "9-9:50am", "LA5-146"]]));

        assert_eq!(slots.len(), 3);
        let days: Vec<WeekdayTag> = slots.iter().map(|slot| slot.day).collect();
        assert_eq!(days, vec![WeekdayTag::M, WeekdayTag::W, WeekdayTag::F]);
        assert!(slots
            .iter()
            .all(|slot| slot.location == "LA5-146" && slot.interval == Interval::new(900, 950)));
    }

    #[test]
    fn test_extract_skips_unscheduled_sections() {
        let slots = extract(&table(&[
            ["01", "TBA", "TBA", "ONLINE-ONLY"],
            ["02", "NA", "NA", "OFF-CAMPUS"],
            ["03", "TuTh", "11-12:15pm", "HC-100"],
        ]));

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|slot| slot.location == "HC-100"));
        assert_eq!(slots[0].interval, Interval::new(1100, 1215));
    }

    #[test]
    fn test_extract_skips_broken_rows() {
        let slots = extract(&table(&[
            ["01", "MW", "whenever", "LA5-146"],
            ["02", "Mx", "2-3:15pm", "VEC-115"],
        ]));

        // Unreadable time drops the row; "Mx" is not a day
        assert!(slots.is_empty());

        let short_row = SectionTable {
            headers: vec!["DAYS".into(), "TIME".into(), "LOCATION".into()],
            rows: vec![vec!["MW".into(), "2-3:15pm".into()]],
        };
        assert!(extract(&short_row).is_empty());
    }

    #[test]
    fn test_subject_links() {
        let html = r##"
            <html><body>
              <div class="indexList">
                <a href="ACCT.html">ACCT</a>
                <a href="#">top</a>
                <a>no link</a>
                <a href="ART.html">ART</a>
              </div>
              <div class="footer"><a href="elsewhere.html">Elsewhere</a></div>
            </body></html>
        "##;

        assert_eq!(subject_links(html), vec!["ACCT.html", "ART.html"]);
    }

    #[test]
    fn test_section_tables() {
        let html = r#"
            <html><body>
              <div class="courseHeader"><h4>CECS 100</h4></div>
              <p>Notes</p>
              <table>
                <tr><th scope="col">SEC.</th><th scope="col">DAYS</th><th scope="col">TIME</th><th scope="col">LOCATION</th></tr>
                <tr><th>01</th><td>TuTh</td><td> 9:30-10:45AM </td><td><span>VEC</span> <span>115</span></td></tr>
              </table>
              <div class="courseHeader extra"><h4>Ignored</h4></div>
              <table>
                <tr><th scope="col">DAYS</th></tr>
                <tr><td>M</td></tr>
              </table>
            </body></html>
        "#;

        let tables = section_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["SEC.", "DAYS", "TIME", "LOCATION"]);
        assert_eq!(tables[0].rows, vec![vec!["01", "TuTh", "9:30-10:45AM", "VEC115"]]);
    }
}
