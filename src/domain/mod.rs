pub mod entry;
pub mod link;
pub mod publisher;

pub use entry::Entry;
pub use link::{Link, LinkUpdate};
pub use publisher::{Publisher, PublisherHash, PublisherUpdate};

use chrono::NaiveDate;

use crate::app::{ContentError, Result};

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| ContentError::InvalidDate(format!("{s}: {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "2024-03-09");
        assert_eq!(parse_date("2024-03-09").unwrap(), date);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("last tuesday"),
            Err(ContentError::InvalidDate(_))
        ));
    }
}
