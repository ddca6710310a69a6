//! Player-name search through the site's client-rendered search box.
//!
//! The site has no name-to-id URL, so the id is found by driving a browser:
//! open a session, type the name into the search field, wait for the result
//! list to render, walk its entries (revealing more when the site offers it)
//! and read the id out of the chosen entry's link.
//!
//! A resolution call is an explicit state machine:
//!
//! ```text
//! Idle -> SessionOpen -> QuerySubmitted -> ResultsVisible -+-> Matched
//!                          ^    |             |    ^       +-> Exhausted
//!                          +----+ (no render) v    |       +-> TimedOut
//!                                          Revealing
//! ```
//!
//! The browser session is closed exactly once on every path out of
//! `SessionOpen`, whatever the outcome.

mod driver;

#[cfg(feature = "chrome")]
mod chrome;

#[cfg(feature = "chrome")]
pub use chrome::ChromeDriver;
pub use driver::{BrowserDriver, DriverSession, ElementSnapshot};

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use understat_core::SearchSettings;

use crate::error::{ExtractionError, SearchError};
use crate::types::SearchResult;

/// Trailing numeric path segment of a player link, e.g. `player/2371`.
static PLAYER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)(\d+)/?(?:[?#].*)?$").expect("valid regex"));

/// Where the search box lives on the landing page and how hard to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub landing_url: String,
    /// Text input of the header search box.
    pub input_selector: String,
    /// Container that appears once results have rendered (possibly empty).
    pub results_selector: String,
    /// One element per result entry: name line, team line, player link.
    pub entry_selector: String,
    /// Control that reveals further entries, if the site renders one.
    pub reveal_selector: Option<String>,
    /// Maximum number of entries inspected per call.
    pub max_results: usize,
    /// Maximum number of rendered lists and reveals per call. Render polls
    /// that never settle are bounded by `budget` instead.
    pub max_cycles: u32,
    /// How long one step waits for the result list to settle.
    pub step_wait: Duration,
    pub poll_interval: Duration,
    /// Wall-clock budget for the whole call.
    pub budget: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_settings(understat_core::config::DEFAULT_BASE_URL, &SearchSettings::default())
    }
}

impl SearchConfig {
    /// Builds a config for the site at `base_url` with the given tuning.
    #[must_use]
    pub fn from_settings(base_url: &str, settings: &SearchSettings) -> Self {
        Self {
            landing_url: format!("{}/", base_url.trim_end_matches('/')),
            input_selector: "#header nav:nth-of-type(2) li:first-child span:first-of-type input"
                .to_owned(),
            results_selector: "#header nav:nth-of-type(2) li:first-child span:first-of-type > div"
                .to_owned(),
            entry_selector:
                "#header nav:nth-of-type(2) li:first-child span:first-of-type > div > div > div"
                    .to_owned(),
            reveal_selector: None,
            max_results: settings.max_results,
            max_cycles: settings.max_cycles,
            step_wait: Duration::from_millis(settings.step_wait_ms),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            budget: Duration::from_secs(settings.budget_secs),
        }
    }
}

/// What a resolution call is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Stop at the entry whose name matches the query.
    FirstMatch,
    /// Collect every entry's id up to `max_results`.
    Collect,
}

#[derive(Debug)]
enum State {
    SessionOpen,
    QuerySubmitted,
    ResultsVisible { entries: Vec<ElementSnapshot> },
    Revealing { seen: usize },
    Matched(SearchResult),
    Collected(Vec<SearchResult>),
    Exhausted,
    TimedOut,
}

/// Bookkeeping carried across cycle steps.
#[derive(Debug, Default)]
struct Progress {
    inspected: usize,
    /// Render cycles that produced a list, plus reveals.
    cycles: u32,
    /// Submissions repeated because the list never rendered.
    resubmits: u32,
    best_partial: Option<ElementSnapshot>,
    collected: Vec<SearchResult>,
}

/// Resolves player names to ids. Holds no session between calls.
#[derive(Debug, Clone, Default)]
pub struct SearchService {
    config: SearchConfig,
}

impl SearchService {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Finds the id of the player called `name`.
    ///
    /// An entry whose name equals `name` (case-insensitive) wins at once. If
    /// none does, the first entry whose name contains `name` is returned once
    /// the results are exhausted.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptyQuery`] if `name` is blank (no session opened).
    /// - [`SearchError::Exhausted`] if no entry matched.
    /// - [`SearchError::TimedOut`] if the budget ran out first.
    /// - [`SearchError::Extraction`] if the matching entry's link has no id.
    /// - [`SearchError::Driver`] if any browser call failed.
    pub fn resolve<D: BrowserDriver>(&self, driver: &D, name: &str) -> Result<SearchResult, SearchError> {
        match self.run(driver, name, Mode::FirstMatch)? {
            Outcome {
                state: State::Matched(result),
                ..
            } => Ok(result),
            outcome => Err(outcome.into_error(name)),
        }
    }

    /// Lists every player the site returns for `name`, in rendered order, up
    /// to `max_results` entries.
    ///
    /// # Errors
    ///
    /// As [`SearchService::resolve`]; an empty result list is
    /// [`SearchError::Exhausted`].
    pub fn candidates<D: BrowserDriver>(
        &self,
        driver: &D,
        name: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self.run(driver, name, Mode::Collect)? {
            Outcome {
                state: State::Collected(results),
                ..
            } => Ok(results),
            outcome => Err(outcome.into_error(name)),
        }
    }

    /// Opens a session, drives it to a terminal state and closes it.
    fn run<D: BrowserDriver>(
        &self,
        driver: &D,
        name: &str,
        mode: Mode,
    ) -> Result<Outcome, SearchError> {
        let query = name.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let started = Instant::now();
        let deadline = started + self.config.budget;

        tracing::debug!(query, ?mode, "opening browser session");
        let mut session = OpenSession::new(driver.open()?);
        let driven = self.drive(session.get_mut(), query, mode, deadline);
        session.release();

        let elapsed = started.elapsed();
        let (state, progress) = driven.inspect_err(|err| {
            tracing::debug!(query, error = %err, elapsed_ms = elapsed.as_millis(), "search failed");
        })?;
        tracing::debug!(
            query,
            ?state,
            inspected = progress.inspected,
            cycles = progress.cycles,
            resubmits = progress.resubmits,
            elapsed_ms = elapsed.as_millis(),
            "search finished"
        );
        Ok(Outcome {
            state,
            inspected: progress.inspected,
            elapsed,
        })
    }

    fn drive<S: DriverSession>(
        &self,
        session: &mut S,
        query: &str,
        mode: Mode,
        deadline: Instant,
    ) -> Result<(State, Progress), SearchError> {
        let config = &self.config;
        let mut progress = Progress::default();
        let mut state = State::SessionOpen;

        loop {
            if Instant::now() >= deadline && !state.is_terminal() {
                state = State::TimedOut;
            }

            state = match state {
                State::SessionOpen => {
                    session.navigate(&config.landing_url)?;
                    session.submit_text(&config.input_selector, query)?;
                    State::QuerySubmitted
                }
                // A list that never renders is retried until the deadline and
                // does not count toward `max_cycles`.
                State::QuerySubmitted => match self.await_entries(session, 0, deadline)? {
                    Some(entries) => {
                        progress.cycles += 1;
                        State::ResultsVisible { entries }
                    }
                    None if Instant::now() >= deadline => State::TimedOut,
                    None => {
                        progress.resubmits += 1;
                        tracing::warn!(
                            query,
                            resubmits = progress.resubmits,
                            "result list did not render in time; submitting again"
                        );
                        session.submit_text(&config.input_selector, query)?;
                        State::QuerySubmitted
                    }
                },
                State::ResultsVisible { entries } => {
                    if let Some(done) = self.inspect(&entries, query, mode, &mut progress)? {
                        done
                    } else if progress.cycles >= config.max_cycles
                        || !self.reveal_more(session)?
                    {
                        exhausted(mode, &mut progress)?
                    } else {
                        State::Revealing {
                            seen: entries.len(),
                        }
                    }
                }
                State::Revealing { seen } => {
                    progress.cycles += 1;
                    match self.await_entries(session, seen, deadline)? {
                        Some(entries) => State::ResultsVisible { entries },
                        None if Instant::now() >= deadline => State::TimedOut,
                        None => exhausted(mode, &mut progress)?,
                    }
                }
                terminal => return Ok((terminal, progress)),
            };
            tracing::trace!(query, ?state, "search transition");
        }
    }

    /// Polls until the result container is present and holds more than
    /// `seen` entries. `None` means the step did not settle in time.
    fn await_entries<S: DriverSession>(
        &self,
        session: &mut S,
        seen: usize,
        deadline: Instant,
    ) -> Result<Option<Vec<ElementSnapshot>>, SearchError> {
        let config = &self.config;
        let step_deadline = (Instant::now() + config.step_wait).min(deadline);

        loop {
            if !session.query_all(&config.results_selector)?.is_empty() {
                let entries = session.query_all(&config.entry_selector)?;
                if seen == 0 || entries.len() > seen {
                    return Ok(Some(entries));
                }
            }

            let now = Instant::now();
            if now >= step_deadline {
                return Ok(None);
            }
            std::thread::sleep(config.poll_interval.min(step_deadline - now));
        }
    }

    /// Inspects entries not seen by earlier steps. Returns a terminal state
    /// once one is reached.
    fn inspect(
        &self,
        entries: &[ElementSnapshot],
        query: &str,
        mode: Mode,
        progress: &mut Progress,
    ) -> Result<Option<State>, SearchError> {
        let wanted = query.to_lowercase();

        for entry in entries.iter().skip(progress.inspected) {
            if progress.inspected >= self.config.max_results {
                break;
            }
            progress.inspected += 1;

            match mode {
                Mode::FirstMatch => {
                    let name = display_lines(entry.text()).0.to_lowercase();
                    if name == wanted {
                        return Ok(Some(State::Matched(search_result(entry)?)));
                    }
                    if progress.best_partial.is_none() && name.contains(&wanted) {
                        progress.best_partial = Some(entry.clone());
                    }
                }
                Mode::Collect => progress.collected.push(search_result(entry)?),
            }
        }

        if progress.inspected >= self.config.max_results {
            return exhausted(mode, progress).map(Some);
        }
        Ok(None)
    }

    /// Clicks the reveal control if the page currently shows one.
    fn reveal_more<S: DriverSession>(&self, session: &mut S) -> Result<bool, SearchError> {
        let Some(selector) = self.config.reveal_selector.as_deref() else {
            return Ok(false);
        };
        if session.query_all(selector)?.is_empty() {
            return Ok(false);
        }
        session.click(selector)?;
        Ok(true)
    }
}

/// Terminal state of one call plus what the error report needs.
#[derive(Debug)]
struct Outcome {
    state: State,
    inspected: usize,
    elapsed: Duration,
}

impl Outcome {
    fn into_error(self, name: &str) -> SearchError {
        let query = name.trim().to_owned();
        match self.state {
            State::TimedOut => SearchError::TimedOut {
                query,
                elapsed: self.elapsed,
            },
            _ => SearchError::Exhausted {
                query,
                inspected: self.inspected,
            },
        }
    }
}

impl State {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            State::Matched(_) | State::Collected(_) | State::Exhausted | State::TimedOut
        )
    }
}

/// Closes the wrapped session exactly once: on [`OpenSession::release`], or
/// on drop if the call unwound before reaching it.
struct OpenSession<S: DriverSession> {
    session: S,
    closed: bool,
}

impl<S: DriverSession> OpenSession<S> {
    fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    fn get_mut(&mut self) -> &mut S {
        &mut self.session
    }

    fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.session.close() {
            tracing::warn!(error = %err, "failed to close browser session");
        }
    }
}

impl<S: DriverSession> Drop for OpenSession<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}

/// Terminal state once no further entries will be inspected.
fn exhausted(mode: Mode, progress: &mut Progress) -> Result<State, SearchError> {
    match mode {
        Mode::FirstMatch => match progress.best_partial.take() {
            Some(entry) => Ok(State::Matched(search_result(&entry)?)),
            None => Ok(State::Exhausted),
        },
        Mode::Collect if progress.collected.is_empty() => Ok(State::Exhausted),
        Mode::Collect => Ok(State::Collected(std::mem::take(&mut progress.collected))),
    }
}

/// Splits entry text into its name line and optional team line.
fn display_lines(text: &str) -> (&str, Option<&str>) {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let name = lines.next().unwrap_or("");
    (name, lines.next())
}

fn search_result(entry: &ElementSnapshot) -> Result<SearchResult, ExtractionError> {
    let link = entry.link_target().unwrap_or_default();
    let player_id = player_id_from_link(link)?;
    let (name, team) = display_lines(entry.text());
    Ok(SearchResult {
        name: name.to_owned(),
        team: team.map(str::to_owned),
        player_id,
    })
}

/// Reads the player id from the last path segment of a result link.
///
/// # Errors
///
/// Returns [`ExtractionError::MissingIdentifier`] if that segment is not a
/// number.
pub fn player_id_from_link(link: &str) -> Result<u64, ExtractionError> {
    PLAYER_ID_RE
        .captures(link.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| ExtractionError::MissingIdentifier {
            link: link.to_owned(),
        })
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
