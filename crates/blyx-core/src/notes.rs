//! Notebook export naming.

use chrono::NaiveDate;

pub fn export_file_name(date: NaiveDate) -> String {
    format!("blyx-notes-{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_dated() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(export_file_name(date), "blyx-notes-2026-01-07.txt");
    }
}
