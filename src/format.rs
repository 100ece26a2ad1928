//! Text helpers shared by the reports and the raw-row table.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// `1234` -> `1,234` (en) or `1.234` (de).
pub fn format_count(n: usize, locale: &Locale) -> String {
    n.to_formatted_string(locale)
}

/// Render a total in seconds as `"<d>d <h>h <m>m <s>s"`.
pub fn format_total_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 86_400 % 3_600) / 60;
    let seconds = total_seconds % 86_400 % 3_600 % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

/// Render a mean in seconds as `"<m>m <s>s"`; each component is floored.
pub fn format_mean_duration(mean_seconds: f64) -> String {
    let minutes = (mean_seconds / 60.0).floor() as i64;
    let seconds = (mean_seconds % 60.0).floor() as i64;
    format!("{minutes}m {seconds}s")
}

/// `"new york city"` -> `"New York City"`.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
