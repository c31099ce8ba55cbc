//! Static content of the academic calendar page.
//!
//! Everything in here is a compile-time literal and is never mutated.

use phf::phf_map;

/// The single year the holiday table is written for.
pub const ACADEMIC_YEAR: i32 = 2024;

pub const TITLE: &str = "একাডেমিক ক্যালেন্ডার ২০২৪";
pub const BACK_LABEL: &str = "হোম পেজে ফিরে যান";
pub const HOLIDAY_HEADING: &str = "ছুটির দিন";
pub const LOADING_LABEL: &str = "লোড হচ্ছে";

pub const MONTH_NAMES: [&str; 12] = [
    "জানুয়ারি",
    "ফেব্রুয়ারি",
    "মার্চ",
    "এপ্রিল",
    "মে",
    "জুন",
    "জুলাই",
    "আগস্ট",
    "সেপ্টেম্বর",
    "অক্টোবর",
    "নভেম্বর",
    "ডিসেম্বর",
];

/// Weekday labels, starting with Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = ["রবি", "সোম", "মঙ্গল", "বুধ", "বৃহস্পতি", "শুক্র", "শনি"];

/// Maps `YYYY-MM-DD` keys to the holiday's display name.
pub static HOLIDAYS: phf::Map<&'static str, &'static str> = phf_map! {
    "2024-01-01" => "নববর্ষ",
    "2024-02-21" => "শহীদ দিবস",
    "2024-03-26" => "স্বাধীনতা দিবস",
    "2024-04-14" => "বাংলা নববর্ষ",
    "2024-05-01" => "মে দিবস",
    "2024-08-15" => "জাতীয় শোক দিবস",
    "2024-12-16" => "বিজয় দিবস",
    "2024-12-25" => "বড়দিন",
};

/// Looks up the holiday label for a date key. A miss simply means the day
/// is not a holiday.
pub fn holiday_label(date_key: &str) -> Option<&'static str> {
    HOLIDAYS.get(date_key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hit_and_miss() {
        assert_eq!(holiday_label("2024-01-01"), Some("নববর্ষ"));
        assert_eq!(holiday_label("2024-12-25"), Some("বড়দিন"));
        assert_eq!(holiday_label("2024-01-02"), None);
        assert_eq!(holiday_label("2024-1-1"), None);
    }

    #[test]
    fn all_keys_are_in_academic_year() {
        assert_eq!(HOLIDAYS.len(), 8);
        for key in HOLIDAYS.keys() {
            assert!(key.starts_with(&format!("{}-", ACADEMIC_YEAR)));
            assert!(chrono::NaiveDate::parse_from_str(key, "%Y-%m-%d").is_ok());
        }
    }
}
