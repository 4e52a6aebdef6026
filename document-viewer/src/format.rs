//! Display helpers for document metadata.

use chrono::{DateTime, Locale, Utc};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

pub const DEFAULT_LOCALE: Locale = Locale::en_US;

/// Resolve a POSIX locale name such as `fr_FR`, falling back to `en_US`.
pub fn parse_locale(name: &str) -> Locale {
    Locale::try_from(name).unwrap_or_else(|_| {
        tracing::warn!(locale = %name, "Unknown locale, falling back to en_US");
        DEFAULT_LOCALE
    })
}

/// Long date-and-time pattern in the order `locale` writes it. Timestamps are UTC and say so.
fn long_date_time(locale: Locale) -> &'static str {
    match locale {
        Locale::en_US | Locale::en_CA | Locale::en_PH => "%A, %B %-d, %Y at %H:%M %Z",
        Locale::en_GB | Locale::en_AU | Locale::en_NZ | Locale::en_IE | Locale::en_ZA => {
            "%A %-d %B %Y at %H:%M %Z"
        }
        Locale::fr_FR | Locale::fr_BE | Locale::fr_CA | Locale::fr_CH => "%A %-d %B %Y à %H:%M %Z",
        Locale::de_DE | Locale::de_AT | Locale::de_CH => "%A, %-d. %B %Y um %H:%M %Z",
        Locale::es_ES | Locale::es_MX => "%A, %-d de %B de %Y, %H:%M %Z",
        Locale::it_IT => "%A %-d %B %Y alle %H:%M %Z",
        Locale::nl_NL | Locale::nl_BE => "%A %-d %B %Y om %H:%M %Z",
        Locale::ja_JP => "%Y年%-m月%-d日(%a) %H:%M %Z",
        _ => "%x %X %Z",
    }
}

pub fn format_date(value: &DateTime<Utc>, locale: Locale) -> String {
    value
        .format_localized(long_date_time(locale), locale)
        .to_string()
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

pub fn mimetype_label(mimetype: &str) -> &'static str {
    match mimetype {
        "application/pdf" => "PDF Document",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            "Word Document"
        }
        _ => "Document",
    }
}

pub fn status_class(status: &str) -> &'static str {
    match status {
        "processing" => "status-processing",
        "processed" => "status-processed",
        "enhanced" => "status-enhanced",
        "failed" => "status-failed",
        _ => "status-default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_sizes_switch_units_at_powers_of_1024() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_575), "1024.0 KB");
        assert_eq!(format_file_size(1_048_576), "1.0 MB");
        assert_eq!(format_file_size(5 * 1_048_576 + 524_288), "5.5 MB");
    }

    #[test]
    fn status_classes() {
        assert_eq!(status_class("processing"), "status-processing");
        assert_eq!(status_class("processed"), "status-processed");
        assert_eq!(status_class("enhanced"), "status-enhanced");
        assert_eq!(status_class("failed"), "status-failed");
        assert_eq!(status_class("unknown"), "status-default");
        assert_eq!(status_class(""), "status-default");
    }

    #[test]
    fn mimetype_labels_match_exactly() {
        assert_eq!(mimetype_label("application/pdf"), "PDF Document");
        assert_eq!(
            mimetype_label(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            "Word Document"
        );
        assert_eq!(mimetype_label("application/PDF"), "Document");
        assert_eq!(mimetype_label("text/plain"), "Document");
    }

    #[test]
    fn us_dates_put_the_month_first() {
        let value = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 0).unwrap();

        assert_eq!(
            format_date(&value, Locale::en_US),
            "Saturday, October 17, 2026 at 09:05 UTC"
        );
        assert_eq!(
            format_date(&value, Locale::en_GB),
            "Saturday 17 October 2026 at 09:05 UTC"
        );
    }

    #[test]
    fn dates_follow_the_locale_order_and_names() {
        let value = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 0).unwrap();

        assert_eq!(
            format_date(&value, Locale::fr_FR),
            "samedi 17 octobre 2026 à 09:05 UTC"
        );
        assert_eq!(
            format_date(&value, Locale::de_DE),
            "Samstag, 17. Oktober 2026 um 09:05 UTC"
        );
        assert_eq!(format_date(&value, Locale::ja_JP), "2026年10月17日(土) 09:05 UTC");
    }

    #[test]
    fn other_locales_use_their_own_short_form_with_the_zone() {
        let value = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 0).unwrap();

        let polish = format_date(&value, Locale::pl_PL);
        assert!(polish.contains("2026"), "{polish}");
        assert!(polish.ends_with(" UTC"), "{polish}");
    }

    #[test]
    fn unknown_locale_falls_back() {
        assert_eq!(parse_locale("fr_FR"), Locale::fr_FR);
        assert_eq!(parse_locale("xx_YY"), DEFAULT_LOCALE);
    }
}
