//! The saved station-type filter, kept in a cookie across reloads.

/// Cookie holding the selected station type code.
pub const FILTER_COOKIE: &str = "selectedpoliceType";

/// 30 days.
pub const COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Value of cookie `name` in a `document.cookie` style string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim_start_matches(' ').split_once('=')?;
        if key != name {
            return None;
        }
        Some(match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        })
    })
}

/// Cookie assignment string for `document.cookie`: root path, `Lax`, 30 days.
pub fn format_cookie(name: &str, value: &str) -> String {
    format!(
        "{}={}; max-age={}; path=/; SameSite=Lax",
        name,
        urlencoding::encode(value),
        COOKIE_MAX_AGE_SECS
    )
}

/// Which stations a refresh should load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Type(String),
}

impl FilterMode {
    /// Interpret a select value or saved cookie; empty means "all types".
    pub fn from_selection(value: &str) -> Self {
        if value.is_empty() {
            FilterMode::All
        } else {
            FilterMode::Type(value.to_string())
        }
    }

    pub fn from_saved(saved: Option<&str>) -> Self {
        saved.map(Self::from_selection).unwrap_or_default()
    }

    /// Select value for this mode.
    pub fn code(&self) -> &str {
        match self {
            FilterMode::All => "",
            FilterMode::Type(code) => code,
        }
    }
}
