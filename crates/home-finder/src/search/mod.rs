//! Client-side search state: the budget, the in-memory result set, the saved
//! report, and the HTTP client for the fetch service.

mod budget;
mod client;
mod report;
mod results;

pub use budget::{record_budget_audit, Budget, BudgetError, BUDGET_AUDIT_FILENAME, MAX_BUDGET, MIN_BUDGET};
pub use client::{HttpPropertySearch, PropertySearch, SearchError};
pub use report::{format_currency, listing_line, SavedReport};
pub use results::{ResultSet, SortOrder, PAGE_SIZE};
