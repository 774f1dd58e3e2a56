use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::budget::Budget;
use super::results::ResultSet;
use crate::listings::PropertyRecord;
use crate::location::Location;

/// Formats whole dollars as `$1,234,567`.
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}

/// One-line summary used by the result previews and pages.
pub fn listing_line(position: usize, record: &PropertyRecord) -> String {
    format!(
        "{position}. {} | {} | {} bd / {} ba | {} sqft",
        record.address,
        format_currency(record.price),
        record.bedrooms,
        record.bathrooms,
        record.square_footage
    )
}

/// Text report of the current result set.
#[derive(Debug)]
pub struct SavedReport<'a> {
    pub location: &'a Location,
    pub budget: Budget,
    pub results: &'a ResultSet,
    pub saved_at: DateTime<Local>,
}

impl SavedReport<'_> {
    pub fn filename(&self) -> String {
        format!("saved_results_{}.txt", self.saved_at.format("%Y%m%d_%H%M%S"))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);

        writeln!(out, "Value Home Finder - Saved Search Results").expect("write title");
        writeln!(out, "{rule}").expect("write rule");
        writeln!(out, "Location: {}", self.location.formatted()).expect("write location");
        writeln!(out, "Budget: {}", format_currency(self.budget.amount())).expect("write budget");
        writeln!(out, "Properties found: {}", self.results.len()).expect("write count");
        writeln!(out, "Saved: {}", self.saved_at.format("%Y-%m-%d %H:%M:%S")).expect("write saved time");
        writeln!(out, "{rule}").expect("write rule");

        for (index, record) in self.results.records().iter().enumerate() {
            writeln!(out).expect("write separator");
            writeln!(out, "{}. {}", index + 1, record.address).expect("write address");
            writeln!(out, "   Price: {}", format_currency(record.price)).expect("write price");
            writeln!(
                out,
                "   Bedrooms: {} | Bathrooms: {} | Square feet: {}",
                record.bedrooms, record.bathrooms, record.square_footage
            )
            .expect("write specs");
            let year_built = record
                .year_built
                .map(|year| year.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            writeln!(
                out,
                "   Type: {} | Year built: {}",
                display_or_unknown(&record.property_type),
                year_built
            )
            .expect("write type");
            writeln!(
                out,
                "   Neighborhood: {} | Zip: {}",
                display_or_unknown(&record.neighborhood),
                display_or_unknown(&record.zip_code)
            )
            .expect("write neighborhood");
            writeln!(out, "   Listing ID: {}", display_or_unknown(&record.listing_id))
                .expect("write listing id");
        }

        out
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.filename());
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

fn display_or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "unknown"
    } else {
        value
    }
}
