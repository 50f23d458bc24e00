use serde::{Deserialize, Serialize};

/// Default page size for list queries.
pub const DEFAULT_LIMIT: u32 = 10;

/// Restricts which experiments a list query returns. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentFilter {
    /// Exact match on the stored status name.
    pub status: Option<String>,
    /// Exact match on the stored category name.
    pub category: Option<String>,
    /// Case-insensitive substring of the researcher name.
    pub researcher: Option<String>,
}

/// A sortable experiment attribute, named as it appears in the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Category,
    StartDate,
    EndDate,
    Budget,
    Researcher,
    Priority,
}

impl SortField {
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            "category" => Some(Self::Category),
            "startDate" => Some(Self::StartDate),
            "endDate" => Some(Self::EndDate),
            "budget" => Some(Self::Budget),
            "researcher" => Some(Self::Researcher),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    /// Newest first.
    pub const DEFAULT: SortKey = SortKey {
        field: SortField::CreatedAt,
        descending: true,
    };

    /// Parse a sort expression such as `-createdAt` or `status,-budget`.
    ///
    /// Keys are separated by commas or whitespace; a leading `-` sorts
    /// descending. An empty expression yields the default ordering. Returns
    /// the first unrecognized key on failure.
    pub fn parse_list(expr: &str) -> Result<Vec<SortKey>, String> {
        let mut keys = Vec::new();
        for token in expr.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let (name, descending) = match token.strip_prefix('-') {
                Some(name) => (name, true),
                None => (token.strip_prefix('+').unwrap_or(token), false),
            };
            let field = SortField::from_api_name(name).ok_or_else(|| name.to_string())?;
            keys.push(SortKey { field, descending });
        }
        if keys.is_empty() {
            keys.push(Self::DEFAULT);
        }
        Ok(keys)
    }
}

/// A 1-based page of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Number of matching rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            total,
            page: request.page,
            limit: request.limit,
            pages: total.div_ceil(limit),
        }
    }
}

/// Raw list query parameters as they arrive on the URL.
///
/// Everything is kept as text so that malformed numbers surface as field
/// violations rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListExperimentsQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub researcher: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

/// A fully parsed list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentQuery {
    pub filter: ExperimentFilter,
    pub sort: Vec<SortKey>,
    pub page: PageRequest,
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
