use chrono::{DateTime, Datelike, Utc};

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const FR_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Page languages with a string table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Resolve a page language tag such as `fr-CA`; unknown tags fall back to English
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "fr" => Locale::Fr,
            _ => Locale::En,
        }
    }

    /// Label shown in place of a date that cannot be interpreted
    pub fn recent_label(self) -> &'static str {
        match self {
            Locale::En => "Recent",
            Locale::Fr => "Récent",
        }
    }

    fn month_name(self, month0: u32) -> &'static str {
        let table = match self {
            Locale::En => &EN_MONTHS,
            Locale::Fr => &FR_MONTHS,
        };
        table[month0 as usize % 12]
    }

    /// `January 2024` / `janvier 2024`
    pub fn month_year(self, dt: DateTime<Utc>) -> String {
        format!("{} {}", self.month_name(dt.month0()), dt.year())
    }

    /// `January 5, 2024` / `5 janvier 2024`
    pub fn long_date(self, dt: DateTime<Utc>) -> String {
        let month = self.month_name(dt.month0());
        match self {
            Locale::En => format!("{} {}, {}", month, dt.day(), dt.year()),
            Locale::Fr => format!("{} {} {}", dt.day(), month, dt.year()),
        }
    }
}
