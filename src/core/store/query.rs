//! List filtering and pagination
//!
//! The router parses query-string parameters into a [`ListQuery`]; the entity store applies
//! it. Filtering happens before pagination, so `page`/`limit` always count matching records.

use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use crate::domain::{Clinician, Hospital, Patient, Role, User};
use chrono::{DateTime, Utc};

/// Page size used when only `page` is supplied
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Typed filter and pagination arguments for `list_*` operations
///
/// `page`/`page_size` (1-based pages) take precedence over `offset`/`limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring matched against each record's searchable text
    pub search: Option<String>,

    /// 1-based page number
    pub page: Option<usize>,

    /// Records per page
    pub page_size: Option<usize>,

    /// Inclusive lower bound on `created_at`
    pub start: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `created_at`
    pub end: Option<DateTime<Utc>>,

    /// Maximum number of records
    pub limit: Option<usize>,

    /// Number of matching records to skip
    pub offset: Option<usize>,
}

impl ListQuery {
    /// A query that matches and returns everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Sets the search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Sets page-based pagination
    pub fn paginate(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Sets the `created_at` window
    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Rejects zero-sized pages and inverted windows
    pub fn validate(&self) -> Result<()> {
        if self.page == Some(0) {
            return Err(WardroomError::validation("page must be >= 1"));
        }
        if self.page_size == Some(0) {
            return Err(WardroomError::validation("pageSize must be >= 1"));
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(WardroomError::validation(format!(
                    "start ({start}) must not be after end ({end})"
                )));
            }
        }
        Ok(())
    }

    /// Offset and optional limit after resolving page-based pagination
    pub fn window(&self) -> (usize, Option<usize>) {
        if self.page.is_some() || self.page_size.is_some() {
            let page = self.page.unwrap_or(1).max(1);
            let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
            return ((page - 1).saturating_mul(size), Some(size));
        }
        (self.offset.unwrap_or(0), self.limit)
    }

    /// Whether a record passes the search and date filters
    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim) {
            if !term.is_empty() && !item.matches_search(&term.to_lowercase()) {
                return false;
            }
        }

        if let Some(created_at) = item.created_at() {
            if self.start.is_some_and(|start| created_at < start) {
                return false;
            }
            if self.end.is_some_and(|end| created_at > end) {
                return false;
            }
        }

        true
    }

    /// Number of records passing the filters, ignoring pagination
    pub fn count<'a, T, I>(&self, items: I) -> usize
    where
        T: Listable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items.into_iter().filter(|item| self.matches(*item)).count()
    }

    /// Filters then paginates, returning owned copies
    pub fn apply<'a, T, I>(&self, items: I) -> Vec<T>
    where
        T: Listable + Clone + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let (offset, limit) = self.window();
        let matching = items
            .into_iter()
            .filter(|item| self.matches(*item))
            .skip(offset)
            .cloned();

        match limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

/// Records that list queries can filter
pub trait Listable {
    /// Whether any searchable field contains `needle` (already lowercased)
    fn matches_search(&self, needle: &str) -> bool;

    /// Creation timestamp used by the `start`/`end` window; records without one always pass
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Listable for Hospital {
    fn matches_search(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || self.country.as_deref().is_some_and(|c| contains(c, needle))
            || contains(&self.timezone, needle)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Listable for User {
    fn matches_search(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains(&self.email, needle)
            || contains(&self.role, needle)
    }
}

impl Listable for Role {
    fn matches_search(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(&self.description, needle)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Listable for Patient {
    fn matches_search(&self, needle: &str) -> bool {
        contains(&self.full_name(), needle)
            || contains(self.mrn.as_str(), needle)
            || self.email.as_deref().is_some_and(|e| contains(e, needle))
            || self.phone.as_deref().is_some_and(|p| contains(p, needle))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Listable for Clinician {
    fn matches_search(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains(&self.email, needle)
            || self.specialties.iter().any(|s| contains(s, needle))
            || self.role.as_deref().is_some_and(|r| contains(r, needle))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HospitalId, Mrn, PatientId};
    use chrono::Duration;
    use test_case::test_case;

    fn patient(seq: u64, first: &str, created_at: DateTime<Utc>) -> Patient {
        Patient {
            id: PatientId::from_sequence(seq),
            hospital_id: HospitalId::from_sequence(1),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: None,
            phone: None,
            mrn: Mrn::from_sequence(seq),
            created_at,
        }
    }

    fn patients(n: u64) -> Vec<Patient> {
        let now = Utc::now();
        (1..=n)
            .map(|i| patient(i, &format!("Patient{i}"), now))
            .collect()
    }

    #[test_case(ListQuery::all(), 0, None ; "no pagination")]
    #[test_case(ListQuery::all().paginate(3, 10), 20, Some(10) ; "third page")]
    #[test_case(ListQuery { page: Some(2), ..Default::default() }, 20, Some(20) ; "page only uses default size")]
    #[test_case(ListQuery { offset: Some(5), limit: Some(2), ..Default::default() }, 5, Some(2) ; "offset and limit")]
    #[test_case(ListQuery { page: Some(1), offset: Some(5), ..Default::default() }, 0, Some(20) ; "page wins over offset")]
    fn test_window(query: ListQuery, offset: usize, limit: Option<usize>) {
        assert_eq!(query.window(), (offset, limit));
    }

    #[test]
    fn test_validate_rejects_zero_page() {
        assert!(ListQuery::all().paginate(0, 10).validate().is_err());
        assert!(ListQuery::all().paginate(1, 0).validate().is_err());
        assert!(ListQuery::all().paginate(1, 10).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let now = Utc::now();
        let query = ListQuery::all().between(Some(now), Some(now - Duration::days(1)));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_apply_paginates_after_filtering() {
        let items = patients(25);
        let page = ListQuery::all().paginate(2, 10).apply(&items);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].first_name, "Patient11");

        let last = ListQuery::all().paginate(3, 10).apply(&items);
        assert_eq!(last.len(), 5);

        let beyond = ListQuery::all().paginate(4, 10).apply(&items);
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_mrn() {
        let items = patients(12);
        let by_name = ListQuery::all().search("PATIENT1").apply(&items);
        // Patient1, Patient10, Patient11, Patient12
        assert_eq!(by_name.len(), 4);

        let by_mrn = ListQuery::all().search("mrn-000007").apply(&items);
        assert_eq!(by_mrn.len(), 1);
        assert_eq!(ListQuery::all().search("mrn-00000").count(&items), 9);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let items = patients(3);
        assert_eq!(ListQuery::all().search("   ").apply(&items).len(), 3);
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let now = Utc::now();
        let items = vec![
            patient(1, "Old", now - Duration::days(10)),
            patient(2, "Edge", now - Duration::days(5)),
            patient(3, "New", now),
        ];

        let query = ListQuery::all().between(Some(now - Duration::days(5)), Some(now));
        let found = query.apply(&items);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].first_name, "Edge");
    }
}
