//! Word listing parameters.
//!
//! Request parameters arrive as loose strings. They are resolved once into a
//! [`WordListQuery`] whose fields can only hold allowed values; anything
//! unrecognized falls back to the default instead of failing the request.

use serde::{Deserialize, Serialize};

/// Fixed page size for paginated listings.
pub const PAGE_SIZE: i64 = 50;

/// Number of pages needed to show `total` rows.
pub fn total_pages(total: i64) -> i64 {
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

/// Row offset of `page`, saturating for page numbers far past the end.
pub fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(PAGE_SIZE)
}

/// Parse a page number, flooring anything missing or invalid at 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Columns the word listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    English,
    Spanish,
    CorrectCount,
    WrongCount,
}

impl SortColumn {
    /// Column expression used in ORDER BY. Never built from user text.
    pub fn sql(&self) -> &'static str {
        match self {
            SortColumn::English => "w.english",
            SortColumn::Spanish => "w.spanish",
            SortColumn::CorrectCount => "correct_count",
            SortColumn::WrongCount => "wrong_count",
        }
    }
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "english" => Ok(SortColumn::English),
            "spanish" => Ok(SortColumn::Spanish),
            "correct_count" => Ok(SortColumn::CorrectCount),
            "wrong_count" => Ok(SortColumn::WrongCount),
            _ => Err(format!("Unknown sort column: {}", s)),
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortColumn::English => write!(f, "english"),
            SortColumn::Spanish => write!(f, "spanish"),
            SortColumn::CorrectCount => write!(f, "correct_count"),
            SortColumn::WrongCount => write!(f, "wrong_count"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Normalized word listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordListQuery {
    /// 1-based page number.
    pub page: i64,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    /// Only words linked to the group with this name.
    pub group: Option<String>,
}

impl Default for WordListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort_by: SortColumn::default(),
            order: SortOrder::default(),
            group: None,
        }
    }
}

impl WordListQuery {
    /// Resolve untyped request parameters.
    pub fn from_raw(
        page: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>,
        group: Option<&str>,
    ) -> Self {
        Self {
            page: parse_page(page),
            sort_by: sort_by.and_then(|s| s.parse().ok()).unwrap_or_default(),
            order: order.and_then(|s| s.parse().ok()).unwrap_or_default(),
            group: group
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
        }
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page)
    }
}
