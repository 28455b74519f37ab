use roomfinder::components::room_finder::cache::{JsonFileStore, RoomStore};
use roomfinder::components::room_finder::extractor::extract_page;
use roomfinder::components::room_finder::models::WeekdayTag;
use roomfinder::components::room_finder::query::{query, QueryOutcome, QueryParams};
use roomfinder::components::room_finder::registry::Registry;
use roomfinder::components::room_finder::request::{render_reply, FindRoomRequest};
use roomfinder::config::Config;

const SUBJECT_PAGE: &str = r#"
<html><body>
  <div class="courseHeader"><h4>CECS 174</h4></div>
  <table>
    <tr><th scope="col">SEC.</th><th scope="col">DAYS</th><th scope="col">TIME</th><th scope="col">LOCATION</th></tr>
    <tr><th>01</th><td>MW</td><td>8-9:15AM</td><td>VEC-115</td></tr>
    <tr><th>02</th><td>TuTh</td><td>11:50-1:15PM</td><td>LA5-146</td></tr>
    <tr><th>03</th><td>TBA</td><td>TBA</td><td>ONLINE-ONLY</td></tr>
  </table>
  <div class="courseHeader"><h4>CECS 225</h4></div>
  <table>
    <tr><th scope="col">SEC.</th><th scope="col">DAYS</th><th scope="col">TIME</th><th scope="col">LOCATION</th></tr>
    <tr><th>01</th><td>MW</td><td>9:30-10:45AM</td><td>LA5-146</td></tr>
  </table>
</body></html>
"#;

/// Smoke test to verify the default config enables the room finder
#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.is_component_enabled("room_finder"));
    assert!(config.discord_token.is_empty());
    assert!(config.max_concurrent_requests >= 1);
}

/// A scraped page answers a query end to end
#[test]
fn test_subject_page_to_reply() {
    let registry = Registry::from_slots(extract_page(SUBJECT_PAGE));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.is_open("LA5-146", WeekdayTag::Th, 1200), Some(false));
    assert_eq!(registry.is_open("LA5-146", WeekdayTag::M, 1200), Some(true));
    assert!(registry.get("ONLINE-ONLY").is_none());

    let request = FindRoomRequest::parse("--v --d M --t 9am".split_whitespace()).unwrap();
    let params = request.to_params(WeekdayTag::F, 1700);
    assert_eq!(params, QueryParams::new(WeekdayTag::M, 900));

    let outcome = query(&registry, &params);
    let QueryOutcome::Found(result) = &outcome else {
        panic!("expected open rooms, got {:?}", outcome);
    };
    assert_eq!(result.best, vec!["LA5-146"]);
    assert_eq!(result.best_until, 930);

    let reply = render_reply(&outcome, &request, &params);
    assert!(reply.contains("**LA5-146**"));
    assert!(reply.contains("--d M --t 900"));
}

/// The cache file survives a save and load
#[tokio::test]
async fn test_json_store_keeps_rooms() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("rooms_data.json"));
    let registry = Registry::from_slots(extract_page(SUBJECT_PAGE));

    store.save(&registry).await.unwrap();

    assert_eq!(store.load().await, Some(registry));
}
