//! Interactive search session driven over a line-oriented console.

mod console;
mod menu;

pub use console::Console;
pub use menu::{MainMenuChoice, ResultsMenuChoice};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::location::{Location, LocationValidator, ValidationOutcome};
use crate::search::{
    format_currency, listing_line, record_budget_audit, Budget, PropertySearch, ResultSet,
    SavedReport, SortOrder,
};
use menu::{HELP, MAIN_MENU, RESULTS_MENU};

pub const FAREWELL: &str = "Thank you for using Value Home Finder. Goodbye!";

const PREVIEW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Welcome,
    MainMenu,
    LocationSetup,
    BudgetSetup,
    Searching,
    ResultsMenu,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("terminal io failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("could not record budget: {0}")]
    BudgetAudit(#[source] io::Error),
    #[error("could not save results: {0}")]
    Report(#[source] io::Error),
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub data_dir: PathBuf,
    pub result_limit: u32,
}

pub struct Session<V, S, R, W> {
    console: Console<R, W>,
    validator: V,
    search: S,
    settings: SessionSettings,
    location: Option<Location>,
    budget: Option<Budget>,
    results: ResultSet,
}

impl<V, S, R, W> Session<V, S, R, W>
where
    V: LocationValidator,
    S: PropertySearch,
    R: BufRead,
    W: Write,
{
    pub fn new(validator: V, search: S, console: Console<R, W>, settings: SessionSettings) -> Self {
        Self {
            console,
            validator,
            search,
            settings,
            location: None,
            budget: None,
            results: ResultSet::default(),
        }
    }

    /// Runs until the user quits or input ends. The validator is shut down
    /// exactly once on the way out, whether or not the session failed.
    pub fn run(mut self) -> Result<(), SessionError> {
        debug!(validator = self.validator.mode(), "session started");
        let mut state = SessionState::Welcome;

        let outcome = loop {
            if state == SessionState::Quit {
                break Ok(());
            }
            match self.step(state) {
                Ok(next) => {
                    debug!(from = ?state, to = ?next, "session transition");
                    state = next;
                }
                Err(err) => break Err(err),
            }
        };

        self.validator.shutdown();

        if outcome.is_ok() {
            self.console.blank()?;
            self.console.say(FAREWELL)?;
        }
        outcome
    }

    fn step(&mut self, state: SessionState) -> Result<SessionState, SessionError> {
        match state {
            SessionState::Welcome => self.welcome(),
            SessionState::MainMenu => self.main_menu(),
            SessionState::LocationSetup => self.location_setup(),
            SessionState::BudgetSetup => self.budget_setup(),
            SessionState::Searching => self.searching(),
            SessionState::ResultsMenu => self.results_menu(),
            SessionState::Quit => Ok(SessionState::Quit),
        }
    }

    fn welcome(&mut self) -> Result<SessionState, SessionError> {
        self.console.say("Welcome to the Value Home Finder CLI")?;
        self.console.say(
            "This tool guides you through finding affordable homes for sale in the city of your choice.",
        )?;
        Ok(SessionState::MainMenu)
    }

    fn main_menu(&mut self) -> Result<SessionState, SessionError> {
        self.console.blank()?;
        for line in MAIN_MENU {
            self.console.say(line)?;
        }

        let Some(input) = self.console.prompt("Select an option (1-3): ")? else {
            return Ok(SessionState::Quit);
        };

        match MainMenuChoice::parse(&input) {
            Some(MainMenuChoice::Search) => {
                self.reset_search();
                Ok(SessionState::LocationSetup)
            }
            Some(MainMenuChoice::Help) => {
                self.console.blank()?;
                for line in HELP {
                    self.console.say(line)?;
                }
                Ok(SessionState::MainMenu)
            }
            Some(MainMenuChoice::Quit) => Ok(SessionState::Quit),
            None => {
                self.console.say("Invalid choice. Please enter 1, 2, or 3.")?;
                Ok(SessionState::MainMenu)
            }
        }
    }

    fn location_setup(&mut self) -> Result<SessionState, SessionError> {
        self.console.blank()?;
        let Some(city) = self.console.prompt("Enter a city: ")? else {
            return Ok(SessionState::Quit);
        };
        let Some(state) = self.console.prompt("Enter a state code (e.g. WA): ")? else {
            return Ok(SessionState::Quit);
        };

        match self.validator.validate(&city, &state) {
            ValidationOutcome::Valid(location) => {
                self.console.say(format!("Location set: {location}"))?;
                info!(location = %location, "location accepted");
                self.location = Some(location);
                Ok(SessionState::BudgetSetup)
            }
            ValidationOutcome::Invalid { error, suggestion } => {
                self.console.say(format!("Error: {error}"))?;
                if let Some(suggestion) = suggestion {
                    self.console.say(format!("Suggestion: {suggestion}"))?;
                }

                let Some(answer) = self.console.prompt("Try again? (y/n): ")? else {
                    return Ok(SessionState::Quit);
                };
                if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
                    Ok(SessionState::LocationSetup)
                } else {
                    Ok(SessionState::MainMenu)
                }
            }
        }
    }

    fn budget_setup(&mut self) -> Result<SessionState, SessionError> {
        loop {
            let Some(input) = self
                .console
                .prompt("Enter your maximum budget (e.g. $450,000): ")?
            else {
                return Ok(SessionState::Quit);
            };

            match Budget::parse(&input) {
                Ok(budget) => {
                    record_budget_audit(&self.settings.data_dir, budget, Local::now())
                        .map_err(SessionError::BudgetAudit)?;
                    self.console
                        .say(format!("Budget set: {}", format_currency(budget.amount())))?;
                    self.budget = Some(budget);
                    return Ok(SessionState::Searching);
                }
                Err(err) => self.console.say(format!("Error: {err}"))?,
            }
        }
    }

    fn searching(&mut self) -> Result<SessionState, SessionError> {
        let (Some(location), Some(budget)) = (self.location.clone(), self.budget) else {
            return Ok(SessionState::LocationSetup);
        };

        self.console.blank()?;
        self.console.say(format!(
            "Searching for homes in {location} up to {}...",
            format_currency(budget.amount())
        ))?;

        let fetched = self
            .search
            .search(&location, self.settings.result_limit)
            .and_then(|summary| {
                let records = self.search.load(&summary)?;
                Ok((summary, records))
            });

        let (summary, records) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(location = %location, error = %err, "search failed");
                self.console.say(format!("Search failed: {err}"))?;
                return Ok(SessionState::MainMenu);
            }
        };

        let total = records.len();
        self.results = ResultSet::within_budget(records, budget);
        info!(
            location = %location,
            fetched = summary.total_properties,
            within_budget = self.results.len(),
            "search completed"
        );

        if self.results.is_empty() {
            self.console.say(format!(
                "No properties found within your budget ({total} listings checked)."
            ))?;
            return Ok(SessionState::MainMenu);
        }

        self.console.say(format!(
            "Found {} of {total} properties within your budget.",
            self.results.len()
        ))?;
        self.preview()?;
        Ok(SessionState::ResultsMenu)
    }

    fn results_menu(&mut self) -> Result<SessionState, SessionError> {
        self.console.blank()?;
        for line in RESULTS_MENU {
            self.console.say(line)?;
        }

        let Some(input) = self.console.prompt("Choose an option: ")? else {
            return Ok(SessionState::Quit);
        };

        match ResultsMenuChoice::parse(&input) {
            Some(ResultsMenuChoice::Sort) => self.sort_results(),
            Some(ResultsMenuChoice::ViewAll) => self.view_all(),
            Some(ResultsMenuChoice::Save) => self.save_results(),
            Some(ResultsMenuChoice::NewSearch) => {
                self.reset_search();
                Ok(SessionState::LocationSetup)
            }
            Some(ResultsMenuChoice::MainMenu) => Ok(SessionState::MainMenu),
            Some(ResultsMenuChoice::Quit) => Ok(SessionState::Quit),
            None => {
                self.console.say("Invalid choice. Please enter S, A, V, N, M, or Q.")?;
                Ok(SessionState::ResultsMenu)
            }
        }
    }

    fn sort_results(&mut self) -> Result<SessionState, SessionError> {
        self.console.blank()?;
        for (index, order) in SortOrder::ALL.iter().enumerate() {
            self.console.say(format!("  {}. {}", index + 1, order.label()))?;
        }

        let Some(input) = self.console.prompt("Sort by (1-3): ")? else {
            return Ok(SessionState::Quit);
        };

        match SortOrder::from_choice(&input) {
            Some(order) => {
                self.results.sort(order);
                self.console.say(format!("Sorted by {}.", order.label()))?;
                self.preview()?;
            }
            None => self.console.say("Invalid sort option.")?,
        }
        Ok(SessionState::ResultsMenu)
    }

    fn view_all(&mut self) -> Result<SessionState, SessionError> {
        let page_count = self.results.pages().len();
        let mut position = 0;

        for (page_index, page) in self.results.pages().enumerate() {
            self.console.blank()?;
            for record in page {
                position += 1;
                self.console.say(listing_line(position, record))?;
            }

            if page_index + 1 < page_count {
                let Some(answer) = self
                    .console
                    .prompt("Press Enter to see more, or 'q' to stop: ")?
                else {
                    return Ok(SessionState::Quit);
                };
                if answer.eq_ignore_ascii_case("q") {
                    break;
                }
            }
        }

        Ok(SessionState::ResultsMenu)
    }

    fn save_results(&mut self) -> Result<SessionState, SessionError> {
        let (Some(location), Some(budget)) = (self.location.as_ref(), self.budget) else {
            self.console.say("Nothing to save yet.")?;
            return Ok(SessionState::ResultsMenu);
        };

        let report = SavedReport {
            location,
            budget,
            results: &self.results,
            saved_at: Local::now(),
        };
        let path = report
            .write_to(&self.settings.data_dir)
            .map_err(SessionError::Report)?;

        info!(path = %path.display(), count = self.results.len(), "saved results report");
        self.console
            .say(format!("Results saved to {}", path.display()))?;
        Ok(SessionState::ResultsMenu)
    }

    fn preview(&mut self) -> Result<(), SessionError> {
        for (index, record) in self.results.records().iter().take(PREVIEW_SIZE).enumerate() {
            self.console.say(listing_line(index + 1, record))?;
        }
        if self.results.len() > PREVIEW_SIZE {
            self.console.say(format!(
                "... and {} more (choose A to view all)",
                self.results.len() - PREVIEW_SIZE
            ))?;
        }
        Ok(())
    }

    fn reset_search(&mut self) {
        self.location = None;
        self.budget = None;
        self.results = ResultSet::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::{FetchSummary, PropertyRecord};
    use crate::location::LocalValidator;
    use crate::search::SearchError;
    use chrono::{TimeZone, Utc};

    struct CannedSearch {
        prices: Vec<u64>,
    }

    impl PropertySearch for CannedSearch {
        fn search(&self, location: &Location, _limit: u32) -> Result<FetchSummary, SearchError> {
            Ok(FetchSummary {
                total_properties: self.prices.len(),
                filename: "properties.csv".to_string(),
                city: location.city.clone(),
                state: location.state.clone(),
                timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap(),
            })
        }

        fn load(&self, summary: &FetchSummary) -> Result<Vec<PropertyRecord>, SearchError> {
            Ok(self
                .prices
                .iter()
                .map(|price| PropertyRecord {
                    address: format!("{price} Main St"),
                    price: *price,
                    bedrooms: 2.0,
                    bathrooms: 1.0,
                    square_footage: 1000,
                    year_built: None,
                    neighborhood: String::new(),
                    property_type: "Condo".to_string(),
                    listing_id: price.to_string(),
                    city: summary.city.clone(),
                    state: summary.state.clone(),
                    zip_code: String::new(),
                    last_updated: summary.timestamp,
                })
                .collect())
        }
    }

    fn run_script(script: &str, prices: Vec<u64>) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut output = Vec::new();
        let session = Session::new(
            LocalValidator,
            CannedSearch { prices },
            Console::new(script.as_bytes(), &mut output),
            SessionSettings {
                data_dir: dir.path().to_path_buf(),
                result_limit: 25,
            },
        );
        session.run().expect("session completes");
        (String::from_utf8(output).expect("utf8 output"), dir)
    }

    #[test]
    fn help_then_quit() {
        let (output, _dir) = run_script("2\n3\n", Vec::new());
        assert!(output.contains("How it works"));
        assert!(output.ends_with(&format!("{FAREWELL}\n")));
    }

    #[test]
    fn invalid_budget_is_reprompted() {
        let (output, dir) = run_script("1\nBoise\nid\n$10,000\nabc\n$300,000\nM\n3\n", vec![250_000]);
        assert!(output.contains("Error: Budget must be between $50,000 and $2,000,000"));
        assert!(output.contains("Error: 'abc' is not a whole dollar amount"));
        assert!(output.contains("Budget set: $300,000"));
        let audit = std::fs::read_to_string(dir.path().join("user_budget.txt")).expect("audit");
        assert!(audit.starts_with("300000\n"));
    }

    #[test]
    fn end_of_input_quits_cleanly() {
        let (output, _dir) = run_script("1\nSeattle\n", Vec::new());
        assert!(output.ends_with(&format!("{FAREWELL}\n")));
    }

    #[test]
    fn empty_result_set_returns_to_main_menu() {
        let (output, _dir) = run_script("1\nSeattle\nWA\n60000\n3\n", vec![900_000]);
        assert!(output.contains("No properties found within your budget (1 listings checked)."));
        assert!(!output.contains("Results menu"));
    }

    #[test]
    fn view_all_pages_every_ten_records() {
        let prices: Vec<u64> = (1..=25).map(|n| 100_000 + n).collect();
        let (output, _dir) = run_script("1\nSeattle\nWA\n500000\nA\n\nq\nQ\n", prices);
        assert_eq!(
            output
                .matches("Press Enter to see more, or 'q' to stop: ")
                .count(),
            2
        );
        assert!(output.contains("20. 100020 Main St"));
        assert!(!output.contains("21. 100021 Main St"));
    }
}
