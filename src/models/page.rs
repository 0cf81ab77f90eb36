//! Offset pagination and sorting primitives shared by repositories.

use std::{fmt, str::FromStr};

/// A movie attribute the listing endpoints may sort on.
///
/// Parsing accepts both the JSON (camelCase) and column (snake_case)
/// spellings, so `releaseYear` and `release_year` name the same field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    MovieId,
    Title,
    Director,
    Studio,
    ReleaseYear,
    Poster,
}

impl SortField {
    /// Column name in the `movies` table. Only these fixed strings ever reach
    /// the `ORDER BY` clause.
    pub fn column(self) -> &'static str {
        match self {
            SortField::MovieId => "movie_id",
            SortField::Title => "title",
            SortField::Director => "director",
            SortField::Studio => "studio",
            SortField::ReleaseYear => "release_year",
            SortField::Poster => "poster",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl fmt::Display for UnknownSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort field `{}`", self.0)
    }
}

impl std::error::Error for UnknownSortField {}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movieId" | "movie_id" => Ok(SortField::MovieId),
            "title" => Ok(SortField::Title),
            "director" => Ok(SortField::Director),
            "studio" => Ok(SortField::Studio),
            "releaseYear" | "release_year" => Ok(SortField::ReleaseYear),
            "poster" => Ok(SortField::Poster),
            other => Err(UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `"asc"` in any case sorts ascending; every other value sorts descending.
    pub fn from_order(order: &str) -> Self {
        if order.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Zero-based page request. `page_size` is checked by the caller to be > 0.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number).saturating_mul(i64::from(self.page_size))
    }
}

/// A slice of results plus totals describing where it sits.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub is_last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = i64::from(request.page_size.max(1));
        let total_pages = (total_elements + size - 1) / size;
        let is_last = i64::from(request.page_number) + 1 >= total_pages;
        Self {
            content,
            page_number: request.page_number,
            page_size: request.page_size,
            total_elements,
            total_pages,
            is_last,
        }
    }
}
