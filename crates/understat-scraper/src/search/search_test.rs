use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::error::DriverError;

const INPUT: &str = "#search input";
const RESULTS: &str = "#search .results";
const ENTRIES: &str = "#search .results .entry";
const REVEAL: &str = "#search .more";

// -----------------------------------------------------------------------
// scripted driver
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
struct Log {
    opened: usize,
    closed: usize,
    navigations: Vec<String>,
    submits: usize,
    clicks: usize,
}

#[derive(Debug, Clone, Default)]
struct Script {
    /// Entry lists shown after the first render and after each reveal.
    pages: Vec<Vec<ElementSnapshot>>,
    /// Submissions needed before the result list renders. `None`: never.
    renders_after: Option<usize>,
    reveal: bool,
    fail_open: bool,
    fail_navigate: bool,
}

impl Script {
    fn rendering(pages: Vec<Vec<ElementSnapshot>>) -> Self {
        Self {
            pages,
            renders_after: Some(1),
            ..Self::default()
        }
    }
}

struct MockDriver {
    script: Script,
    log: Rc<RefCell<Log>>,
}

impl MockDriver {
    fn new(script: Script) -> Self {
        Self {
            script,
            log: Rc::default(),
        }
    }

    fn log(&self) -> std::cell::Ref<'_, Log> {
        self.log.borrow()
    }
}

impl BrowserDriver for MockDriver {
    type Session = MockSession;

    fn open(&self) -> Result<MockSession, DriverError> {
        if self.script.fail_open {
            return Err(DriverError::new("launch", "no browser installed"));
        }
        self.log.borrow_mut().opened += 1;
        Ok(MockSession {
            script: self.script.clone(),
            log: Rc::clone(&self.log),
            submits: 0,
            reveals: 0,
        })
    }
}

struct MockSession {
    script: Script,
    log: Rc<RefCell<Log>>,
    submits: usize,
    reveals: usize,
}

impl MockSession {
    fn rendered(&self) -> bool {
        self.script.renders_after.is_some_and(|n| self.submits >= n)
    }
}

impl DriverSession for MockSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        if self.script.fail_navigate {
            return Err(DriverError::new("navigate", "net::ERR_NAME_NOT_RESOLVED"));
        }
        self.log.borrow_mut().navigations.push(url.to_owned());
        Ok(())
    }

    fn submit_text(&mut self, selector: &str, _text: &str) -> Result<(), DriverError> {
        assert_eq!(selector, INPUT);
        self.submits += 1;
        self.log.borrow_mut().submits += 1;
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        assert_eq!(selector, REVEAL);
        self.reveals += 1;
        self.log.borrow_mut().clicks += 1;
        Ok(())
    }

    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, DriverError> {
        let pages = &self.script.pages;
        let found = match selector {
            RESULTS if self.rendered() => vec![ElementSnapshot::default()],
            ENTRIES if self.rendered() => pages
                .get(self.reveals)
                .or(pages.last())
                .cloned()
                .unwrap_or_default(),
            REVEAL if self.script.reveal && self.reveals + 1 < pages.len() => {
                vec![ElementSnapshot::new("More", None)]
            }
            RESULTS | ENTRIES | REVEAL => Vec::new(),
            other => panic!("unexpected selector {other}"),
        };
        Ok(found)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.log.borrow_mut().closed += 1;
        Ok(())
    }
}

fn entry(name: &str, team: &str, id: u64) -> ElementSnapshot {
    ElementSnapshot::new(
        format!("{name}\n{team}"),
        Some(format!("https://understat.com/player/{id}")),
    )
}

fn config() -> SearchConfig {
    SearchConfig {
        landing_url: "https://understat.com/".to_owned(),
        input_selector: INPUT.to_owned(),
        results_selector: RESULTS.to_owned(),
        entry_selector: ENTRIES.to_owned(),
        reveal_selector: Some(REVEAL.to_owned()),
        max_results: 10,
        max_cycles: 10,
        step_wait: Duration::from_millis(30),
        poll_interval: Duration::from_millis(1),
        budget: Duration::from_secs(5),
    }
}

fn service() -> SearchService {
    SearchService::new(config())
}

// -----------------------------------------------------------------------
// resolve
// -----------------------------------------------------------------------

#[test]
fn exact_match_on_first_render_is_resolved() {
    let driver = MockDriver::new(Script::rendering(vec![vec![
        entry("Kevin De Bruyne", "Manchester City", 447),
        entry("Cristiano Ronaldo", "Juventus", 2371),
    ]]));

    let result = service().resolve(&driver, " cristiano ronaldo ").unwrap();

    assert_eq!(
        result,
        SearchResult {
            name: "Cristiano Ronaldo".to_owned(),
            team: Some("Juventus".to_owned()),
            player_id: 2371,
        }
    );
    let log = driver.log();
    assert_eq!(log.opened, 1);
    assert_eq!(log.closed, 1);
    assert_eq!(log.navigations, vec!["https://understat.com/"]);
    assert_eq!(log.submits, 1);
}

#[test]
fn no_matching_entry_is_exhausted_not_timed_out() {
    let driver = MockDriver::new(Script::rendering(vec![vec![
        entry("Kevin De Bruyne", "Manchester City", 447),
        entry("Raheem Sterling", "Manchester City", 618),
    ]]));

    let err = service().resolve(&driver, "Nobody Atall").unwrap_err();

    assert!(
        matches!(err, SearchError::Exhausted { inspected: 2, ref query } if query == "Nobody Atall"),
        "{err:?}"
    );
    assert_eq!(driver.log().closed, 1);
}

#[test]
fn render_that_never_completes_times_out_and_closes_once() {
    let driver = MockDriver::new(Script::default());
    let service = SearchService::new(SearchConfig {
        max_cycles: 10_000,
        step_wait: Duration::from_millis(10),
        budget: Duration::from_millis(80),
        ..config()
    });

    let err = service.resolve(&driver, "Mohamed Salah").unwrap_err();

    match err {
        SearchError::TimedOut { query, elapsed } => {
            assert_eq!(query, "Mohamed Salah");
            assert!(elapsed >= Duration::from_millis(80), "{elapsed:?}");
        }
        other => panic!("expected TimedOut, got: {other:?}"),
    }
    let log = driver.log();
    assert_eq!(log.opened, 1);
    assert_eq!(log.closed, 1);
    assert!(log.submits > 1, "query should be re-submitted between steps");
}

#[test]
fn late_render_is_retried_within_the_budget() {
    let driver = MockDriver::new(Script {
        renders_after: Some(2),
        ..Script::rendering(vec![vec![entry("Mohamed Salah", "Liverpool", 1250)]])
    });

    let result = service().resolve(&driver, "Mohamed Salah").unwrap();

    assert_eq!(result.player_id, 1250);
    assert_eq!(driver.log().submits, 2);
}

#[test]
fn unrendered_results_time_out_even_with_few_cycles() {
    let driver = MockDriver::new(Script::default());
    let service = SearchService::new(SearchConfig {
        max_cycles: 3,
        step_wait: Duration::from_millis(5),
        budget: Duration::from_millis(100),
        ..config()
    });

    let err = service.resolve(&driver, "Mohamed Salah").unwrap_err();

    assert!(matches!(err, SearchError::TimedOut { .. }), "{err:?}");
    assert!(driver.log().submits > 3, "{}", driver.log().submits);
    assert_eq!(driver.log().closed, 1);
}

#[test]
fn stalled_site_with_standard_ratio_times_out() {
    // Ten polls of 50ms fit inside the 600ms budget, mirroring the default
    // 10 x 5s steps against a 60s budget.
    let driver = MockDriver::new(Script::default());
    let service = SearchService::new(SearchConfig {
        max_cycles: 10,
        step_wait: Duration::from_millis(50),
        poll_interval: Duration::from_millis(5),
        budget: Duration::from_millis(600),
        ..config()
    });

    let err = service.resolve(&driver, "Mohamed Salah").unwrap_err();

    match err {
        SearchError::TimedOut { elapsed, .. } => {
            assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        }
        other => panic!("expected TimedOut, got: {other:?}"),
    }
    let log = driver.log();
    assert_eq!(log.opened, 1);
    assert_eq!(log.closed, 1);
}

#[test]
fn reveal_control_brings_in_further_entries() {
    let first = vec![
        entry("Harry Kane", "Tottenham", 647),
        entry("Harry Wilson", "Liverpool", 1733),
    ];
    let mut second = first.clone();
    second.push(entry("Harry Winks", "Tottenham", 821));
    second.push(entry("Harry Maguire", "Manchester United", 1687));
    let driver = MockDriver::new(Script {
        reveal: true,
        ..Script::rendering(vec![first, second])
    });

    let result = service().resolve(&driver, "harry maguire").unwrap();

    assert_eq!(result.player_id, 1687);
    assert_eq!(result.team.as_deref(), Some("Manchester United"));
    assert_eq!(driver.log().clicks, 1);
}

#[test]
fn inspection_stops_at_max_results() {
    let first = vec![entry("A One", "X", 1), entry("B Two", "X", 2)];
    let mut second = first.clone();
    second.push(entry("C Three", "X", 3));
    second.push(entry("D Four", "X", 4));
    let driver = MockDriver::new(Script {
        reveal: true,
        ..Script::rendering(vec![first, second])
    });
    let service = SearchService::new(SearchConfig {
        max_results: 3,
        ..config()
    });

    let err = service.resolve(&driver, "D Four").unwrap_err();

    assert!(
        matches!(err, SearchError::Exhausted { inspected: 3, .. }),
        "{err:?}"
    );
}

#[test]
fn missing_reveal_control_ends_the_search() {
    let driver = MockDriver::new(Script::rendering(vec![
        vec![entry("A One", "X", 1)],
        vec![entry("A One", "X", 1), entry("B Two", "X", 2)],
    ]));

    let err = service().resolve(&driver, "B Two").unwrap_err();

    assert!(matches!(err, SearchError::Exhausted { inspected: 1, .. }));
    assert_eq!(driver.log().clicks, 0);
}

#[test]
fn first_partial_match_is_the_fallback() {
    let driver = MockDriver::new(Script::rendering(vec![vec![
        entry("Sadio Mane", "Liverpool", 838),
        entry("Mohamed Salah", "Liverpool", 1250),
        entry("Salah Hassan", "Al Ahly", 9001),
    ]]));

    let result = service().resolve(&driver, "salah").unwrap();

    assert_eq!(result.player_id, 1250);
}

#[test]
fn exact_match_beats_an_earlier_partial_match() {
    let driver = MockDriver::new(Script::rendering(vec![vec![
        entry("Son Heung-Min", "Tottenham", 453),
        entry("Son", "Example FC", 9999),
    ]]));

    let result = service().resolve(&driver, "Son").unwrap();

    assert_eq!(result.player_id, 9999);
}

#[test]
fn matching_entry_without_numeric_link_is_an_extraction_error() {
    let driver = MockDriver::new(Script::rendering(vec![vec![ElementSnapshot::new(
        "Mohamed Salah\nLiverpool",
        Some("https://understat.com/player/".to_owned()),
    )]]));

    let err = service().resolve(&driver, "Mohamed Salah").unwrap_err();

    assert!(
        matches!(
            err,
            SearchError::Extraction(ExtractionError::MissingIdentifier { .. })
        ),
        "{err:?}"
    );
    assert_eq!(driver.log().closed, 1);
}

#[test]
fn navigation_failure_still_closes_the_session() {
    let driver = MockDriver::new(Script {
        fail_navigate: true,
        ..Script::rendering(vec![])
    });

    let err = service().resolve(&driver, "Mohamed Salah").unwrap_err();

    assert!(matches!(err, SearchError::Driver(_)), "{err:?}");
    let log = driver.log();
    assert_eq!(log.opened, 1);
    assert_eq!(log.closed, 1);
}

#[test]
fn failed_launch_has_nothing_to_close() {
    let driver = MockDriver::new(Script {
        fail_open: true,
        ..Script::default()
    });

    let err = service().resolve(&driver, "Mohamed Salah").unwrap_err();

    assert!(matches!(err, SearchError::Driver(ref e) if e.action == "launch"));
    assert_eq!(driver.log().closed, 0);
}

#[test]
fn blank_query_does_not_open_a_session() {
    let driver = MockDriver::new(Script::default());

    let err = service().resolve(&driver, "   ").unwrap_err();

    assert!(matches!(err, SearchError::EmptyQuery));
    assert_eq!(driver.log().opened, 0);
}

// -----------------------------------------------------------------------
// candidates
// -----------------------------------------------------------------------

#[test]
fn candidates_are_listed_in_order_up_to_the_limit() {
    let driver = MockDriver::new(Script::rendering(vec![vec![
        entry("Harry Kane", "Tottenham", 647),
        entry("Harry Wilson", "Liverpool", 1733),
        entry("Harry Winks", "Tottenham", 821),
    ]]));
    let service = SearchService::new(SearchConfig {
        max_results: 2,
        ..config()
    });

    let found = service.candidates(&driver, "Harry").unwrap();

    let ids: Vec<_> = found.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, vec![647, 1733]);
    assert_eq!(found[1].name, "Harry Wilson");
    assert_eq!(driver.log().closed, 1);
}

#[test]
fn empty_result_list_has_no_candidates() {
    let driver = MockDriver::new(Script::rendering(vec![vec![]]));

    let err = service().candidates(&driver, "Zzzz").unwrap_err();

    assert!(
        matches!(err, SearchError::Exhausted { inspected: 0, .. }),
        "{err:?}"
    );
}

// -----------------------------------------------------------------------
// helpers
// -----------------------------------------------------------------------

#[test]
fn player_id_is_read_from_the_last_path_segment() {
    assert_eq!(
        player_id_from_link("https://understat.com/player/2371").unwrap(),
        2371
    );
    assert_eq!(player_id_from_link("player/647/").unwrap(), 647);
    assert_eq!(player_id_from_link("/player/647?league=EPL").unwrap(), 647);
}

#[test]
fn link_without_numeric_segment_is_rejected() {
    for link in [
        "",
        "https://understat.com/player/abc",
        "https://understat.com/player/12abc",
    ] {
        assert!(
            matches!(
                player_id_from_link(link),
                Err(ExtractionError::MissingIdentifier { .. })
            ),
            "{link:?} should be rejected"
        );
    }
}

#[test]
fn default_config_uses_standard_limits() {
    let config = SearchConfig::default();
    assert_eq!(config.landing_url, "https://understat.com/");
    assert_eq!(config.max_results, 5);
    assert_eq!(config.max_cycles, 10);
    assert_eq!(config.step_wait, Duration::from_secs(5));
    assert_eq!(config.budget, Duration::from_secs(60));
    assert!(config.reveal_selector.is_none());
}

#[test]
fn config_follows_base_url() {
    let config = SearchConfig::from_settings("http://127.0.0.1:8080", &SearchSettings::default());
    assert_eq!(config.landing_url, "http://127.0.0.1:8080/");
}
