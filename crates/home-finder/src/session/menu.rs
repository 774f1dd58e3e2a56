#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    Search,
    Help,
    Quit,
}

impl MainMenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MainMenuChoice::Search),
            "2" => Some(MainMenuChoice::Help),
            "3" => Some(MainMenuChoice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsMenuChoice {
    Sort,
    ViewAll,
    Save,
    NewSearch,
    MainMenu,
    Quit,
}

impl ResultsMenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "S" => Some(ResultsMenuChoice::Sort),
            "A" => Some(ResultsMenuChoice::ViewAll),
            "V" => Some(ResultsMenuChoice::Save),
            "N" => Some(ResultsMenuChoice::NewSearch),
            "M" => Some(ResultsMenuChoice::MainMenu),
            "Q" => Some(ResultsMenuChoice::Quit),
            _ => None,
        }
    }
}

pub(crate) const MAIN_MENU: [&str; 4] = [
    "Main menu",
    "  1. Search for homes",
    "  2. Help",
    "  3. Quit",
];

pub(crate) const RESULTS_MENU: [&str; 7] = [
    "Results menu",
    "  S - Sort results",
    "  A - View all results",
    "  V - Save results to a file",
    "  N - New search",
    "  M - Back to main menu",
    "  Q - Quit",
];

pub(crate) const HELP: [&str; 6] = [
    "How it works",
    "  1. Enter a US city and its two-letter state code (for example Seattle, WA).",
    "  2. Enter your maximum budget between $50,000 and $2,000,000.",
    "  3. Active listings are fetched and filtered to your budget.",
    "  4. Sort, browse, or save the results from the results menu.",
    "  Press Ctrl-C at any time to exit.",
];
