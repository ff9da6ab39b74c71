use chrono::{DateTime, Utc};

use super::domain::{Collaboration, Profile, VerificationStatus};

/// Records that can be narrowed by the free-text listing filter.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Searchable for Profile {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.skills.as_str(),
            self.passions.as_str(),
            self.languages.as_str(),
            self.projects.as_str(),
        ]
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Searchable for Collaboration {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.email.as_str(),
        ]
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Normalized query; blank input means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Keep records matching `query` on any searchable field, newest first.
pub fn filter_newest_first<T: Searchable>(records: Vec<T>, query: &SearchQuery) -> Vec<T> {
    let mut matched: Vec<T> = records
        .into_iter()
        .filter(|record| query.matches_any(record.search_fields()))
        .collect();
    matched.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    matched
}

/// Moderation list filter: narrower text fields plus an optional status.
#[derive(Debug, Clone, Default)]
pub struct AdminProfileFilter {
    pub query: SearchQuery,
    pub status: Option<VerificationStatus>,
}

impl AdminProfileFilter {
    pub fn admits(&self, profile: &Profile) -> bool {
        if let Some(status) = self.status {
            if profile.verification_status != status {
                return false;
            }
        }
        self.query.matches_any([
            profile.name.as_str(),
            profile.skills.as_str(),
            profile.passions.as_str(),
        ])
    }
}

/// One page of a newest-first listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn slice(records: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = records.len();
        // out-of-range pages come back empty rather than overflowing the offset
        let offset = (page - 1).saturating_mul(per_page);
        let items = records
            .into_iter()
            .skip(offset)
            .take(per_page)
            .collect();
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }
}
