//! Short date formats for `toLocaleDateString()`
//!
//! A small built-in table keyed by BCP 47 tag. Lookup tries the full tag,
//! then the language subtag, then falls back to `en-US`.

use chrono::Datelike;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

#[derive(Debug, Clone, Copy)]
struct DateStyle {
    order: Order,
    sep: &'static str,
    pad: bool,
    trailing: &'static str,
}

const fn style(order: Order, sep: &'static str, pad: bool) -> DateStyle {
    DateStyle {
        order,
        sep,
        pad,
        trailing: "",
    }
}

const US: DateStyle = style(Order::MonthDayYear, "/", false);
const SLASH_PADDED: DateStyle = style(Order::DayMonthYear, "/", true);
const SLASH: DateStyle = style(Order::DayMonthYear, "/", false);
const DOTTED: DateStyle = style(Order::DayMonthYear, ".", false);
const DOTTED_PADDED: DateStyle = style(Order::DayMonthYear, ".", true);
const DASHED: DateStyle = style(Order::DayMonthYear, "-", false);
const ISO: DateStyle = style(Order::YearMonthDay, "-", true);
const CJK: DateStyle = style(Order::YearMonthDay, "/", false);
const KOREAN: DateStyle = DateStyle {
    order: Order::YearMonthDay,
    sep: ". ",
    pad: false,
    trailing: ".",
};

fn lookup(tag: &str) -> Option<DateStyle> {
    let style = match tag {
        "en-us" | "en" => US,
        "en-gb" | "en-au" | "en-in" | "fr-fr" | "fr" | "pt-br" | "pt" => SLASH_PADDED,
        "en-ca" | "sv-se" | "sv" => ISO,
        "id-id" | "id" | "es-es" | "es" | "it-it" | "it" => SLASH,
        "de-de" | "de" => DOTTED,
        "ru-ru" | "ru" | "tr-tr" | "tr" => DOTTED_PADDED,
        "nl-nl" | "nl" => DASHED,
        "ja-jp" | "ja" | "zh-cn" | "zh" => CJK,
        "ko-kr" | "ko" => KOREAN,
        _ => return None,
    };
    Some(style)
}

/// Whether `tag` has its own entry (or a language entry) in the table
pub fn is_known(tag: &str) -> bool {
    resolve(tag).is_some()
}

fn resolve(tag: &str) -> Option<DateStyle> {
    let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
    lookup(&tag).or_else(|| lookup(tag.split('-').next().unwrap_or_default()))
}

/// Format a calendar date in the short style of `locale`
pub fn format_date(date: &impl Datelike, locale: &str) -> String {
    let style = resolve(locale).unwrap_or(US);
    let (d, m) = if style.pad {
        (format!("{:02}", date.day()), format!("{:02}", date.month()))
    } else {
        (date.day().to_string(), date.month().to_string())
    };
    let y = date.year().to_string();

    let parts = match style.order {
        Order::MonthDayYear => [m, d, y],
        Order::DayMonthYear => [d, m, y],
        Order::YearMonthDay => [y, m, d],
    };
    format!("{}{}", parts.join(style.sep), style.trailing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_known_locales() {
        let d = date();
        assert_eq!(format_date(&d, "en-US"), "3/7/2024");
        assert_eq!(format_date(&d, "en-GB"), "07/03/2024");
        assert_eq!(format_date(&d, "id-ID"), "7/3/2024");
        assert_eq!(format_date(&d, "de-DE"), "7.3.2024");
        assert_eq!(format_date(&d, "ru-RU"), "07.03.2024");
        assert_eq!(format_date(&d, "nl-NL"), "7-3-2024");
        assert_eq!(format_date(&d, "ja-JP"), "2024/3/7");
        assert_eq!(format_date(&d, "ko-KR"), "2024. 3. 7.");
        assert_eq!(format_date(&d, "sv-SE"), "2024-03-07");
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(format_date(&date(), "de-AT"), "7.3.2024");
        assert_eq!(format_date(&date(), "fr_CA"), "07/03/2024");
    }

    #[test]
    fn test_unknown_uses_us() {
        assert!(!is_known("xx-YY"));
        assert_eq!(format_date(&date(), "xx-YY"), "3/7/2024");
    }
}
