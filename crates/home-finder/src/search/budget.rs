use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};

pub const MIN_BUDGET: u64 = 50_000;
pub const MAX_BUDGET: u64 = 2_000_000;
pub const BUDGET_AUDIT_FILENAME: &str = "user_budget.txt";

/// Maximum purchase price in whole dollars, always within the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Budget(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetError {
    #[error("Please enter a budget amount")]
    Empty,
    #[error("'{0}' is not a whole dollar amount")]
    NotANumber(String),
    #[error("Budget must be between $50,000 and $2,000,000")]
    OutOfRange(i128),
}

impl Budget {
    pub fn new(amount: u64) -> Result<Self, BudgetError> {
        if (MIN_BUDGET..=MAX_BUDGET).contains(&amount) {
            Ok(Self(amount))
        } else {
            Err(BudgetError::OutOfRange(i128::from(amount)))
        }
    }

    /// Parses user input such as `$1,200,000`, ignoring currency symbols,
    /// thousands separators and whitespace.
    pub fn parse(raw: &str) -> Result<Self, BudgetError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Err(BudgetError::Empty);
        }

        let digits = cleaned.strip_prefix('-').unwrap_or(&cleaned);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(BudgetError::NotANumber(raw.trim().to_string()));
        }

        // Digit strings too wide for i128 are still amounts, just far out of range.
        let amount = cleaned.parse::<i128>().unwrap_or(if cleaned.starts_with('-') {
            i128::MIN
        } else {
            i128::MAX
        });
        match u64::try_from(amount) {
            Ok(amount) => Self::new(amount),
            Err(_) => Err(BudgetError::OutOfRange(amount)),
        }
    }

    pub fn amount(self) -> u64 {
        self.0
    }

    pub fn allows(self, price: u64) -> bool {
        price <= self.0
    }
}

impl FromStr for Budget {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Overwrites the audit file with `amount\ntimestamp`.
pub fn record_budget_audit(
    dir: &Path,
    budget: Budget,
    recorded_at: DateTime<Local>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(BUDGET_AUDIT_FILENAME);
    fs::write(
        &path,
        format!("{}\n{}\n", budget.amount(), recorded_at.to_rfc3339()),
    )?;
    Ok(path)
}
