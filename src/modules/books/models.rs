use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const TEXT_MAX_CHARS: usize = 255;
pub const ISBN_MIN_CHARS: usize = 10;
pub const ISBN_MAX_CHARS: usize = 13;
pub const PUBLISHED_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1000..=2024;
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// A book as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
}

impl CreateBook {
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        check_chars(&mut violations, "title", &self.title, 1, TEXT_MAX_CHARS);
        check_chars(&mut violations, "author", &self.author, 1, TEXT_MAX_CHARS);
        if let Some(isbn) = &self.isbn {
            check_chars(&mut violations, "isbn", isbn, ISBN_MIN_CHARS, ISBN_MAX_CHARS);
        }
        if let Some(year) = self.published_year {
            if !PUBLISHED_YEAR_RANGE.contains(&year) {
                violations.push(FieldViolation::new(
                    "published_year",
                    format!(
                        "must be between {} and {}",
                        PUBLISHED_YEAR_RANGE.start(),
                        PUBLISHED_YEAR_RANGE.end()
                    ),
                ));
            }
        }
        into_result(violations)
    }
}

/// A review of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
}

/// Request model for reviewing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReview {
    pub reviewer_name: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl CreateReview {
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        check_chars(
            &mut violations,
            "reviewer_name",
            &self.reviewer_name,
            1,
            TEXT_MAX_CHARS,
        );
        if !RATING_RANGE.contains(&self.rating) {
            violations.push(FieldViolation::new(
                "rating",
                format!(
                    "must be between {} and {}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end()
                ),
            ));
        }
        into_result(violations)
    }
}

/// Raw `?skip=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "PageParams::default_limit")]
    pub limit: i64,
}

impl PageParams {
    fn default_limit() -> i64 {
        DEFAULT_PAGE_LIMIT
    }

    pub fn window(self) -> Result<PageWindow, Vec<FieldViolation>> {
        PageWindow::new(self.skip, self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// A validated pagination window: `skip >= 0`, `1 <= limit <= 1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    skip: i64,
    limit: i64,
}

impl PageWindow {
    pub fn new(skip: i64, limit: i64) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if skip < 0 {
            violations.push(FieldViolation::new("skip", "must be greater than or equal to 0"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            violations.push(FieldViolation::new(
                "limit",
                format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
        into_result(violations).map(|()| Self { skip, limit })
    }

    /// Window starting at offset zero; `limit` must already be in range.
    pub(crate) const fn first_page(limit: i64) -> Self {
        Self { skip: 0, limit }
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_LIMIT)
    }
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            field,
            error: error.into(),
        }
    }
}

fn check_chars(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let chars = value.chars().count();
    if chars < min {
        violations.push(FieldViolation::new(
            field,
            format!("must be at least {min} characters"),
        ));
    } else if chars > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

fn into_result(violations: Vec<FieldViolation>) -> Result<(), Vec<FieldViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
