//! Strongly-typed value objects used by the query-state controller.
//!
//! These wrappers enforce the basic invariants of a list query (1-indexed
//! pages, positive page sizes, a fixed set of filter keys) so that once a value
//! reaches the controller it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Page numbers are 1-indexed.
    #[error("page must be greater than zero")]
    ZeroPage,
    /// Page size input could not be parsed as an integer.
    #[error("page size is not a number: {0:?}")]
    NonNumericPageSize(String),
    /// Page size parsed to zero.
    #[error("page size must be greater than zero")]
    NonPositivePageSize,
    /// Page size is valid but not one of the offered choices.
    #[error("page size {0} is not offered")]
    PageSizeNotOffered(usize),
    /// Filter key outside the known filter set.
    #[error("unknown filter key: {0}")]
    UnknownFilterKey(String),
    /// Sort order other than `asc` or `desc`.
    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),
}

/// 1-indexed page number.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageNumber(usize);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// Creates a page number ensuring it is at least one.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::ZeroPage)
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl Display for PageNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageNumber {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for usize {
    fn from(value: PageNumber) -> Self {
        value.0
    }
}

/// Number of rows requested per page.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(10);

    /// Creates a page size ensuring it is positive.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositivePageSize)
        }
    }

    /// Parses raw select-box input into a page size.
    ///
    /// The input is trimmed and must be a base-10 integer. When `offered` is
    /// non-empty the size must also be one of the offered choices. Malformed
    /// input is rejected; it is never coerced to zero.
    pub fn parse(input: &str, offered: &[usize]) -> Result<Self, TypeConstraintError> {
        let trimmed = input.trim();
        let value = trimmed
            .parse::<usize>()
            .map_err(|_| TypeConstraintError::NonNumericPageSize(trimmed.to_string()))?;
        let size = Self::new(value)?;
        if !offered.is_empty() && !offered.contains(&value) {
            return Err(TypeConstraintError::PageSizeNotOffered(value));
        }
        Ok(size)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Sort direction of the single active sort column.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(TypeConstraintError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// The fixed set of filter dimensions a list view can constrain.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    Status,
    Category,
    StartDate,
    EndDate,
    Price,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        Self::Status,
        Self::Category,
        Self::StartDate,
        Self::EndDate,
        Self::Price,
    ];

    /// Name used by the list views when they report a filter change.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Category => "category",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::Price => "price",
        }
    }

    /// Parameter name the list endpoints expect for this filter.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Category => "categoryId",
            Self::StartDate => "minStartDate",
            Self::EndDate => "maxEndDate",
            Self::Price => "price",
        }
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| TypeConstraintError::UnknownFilterKey(s.to_string()))
    }
}

/// Normalizes free-text search input: surrounding whitespace is dropped and
/// the text is lower-cased.
pub fn normalize_search(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns `true` when a filter value actually constrains the result set.
///
/// Only blank values are treated as "no constraint"; `"0"` and `"false"` are
/// ordinary values.
pub fn is_constraint(value: &str) -> bool {
    !value.trim().is_empty()
}
