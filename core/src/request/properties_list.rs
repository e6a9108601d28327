use chrono::Datelike;
use serde_json::Value;

use super::{join_langs, QueryParams};
use crate::error::ApiError;
use crate::http::Params;

/// Parameters for the full listings endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesListRequest {
    per_page: i64,
    page: i64,
    lang: Option<String>,
    updated_after: Option<String>,
    updated_before: Option<String>,
}

impl Default for PropertiesListRequest {
    fn default() -> Self {
        Self {
            per_page: Self::MAX_PER_PAGE,
            page: 0,
            lang: None,
            updated_after: None,
            updated_before: None,
        }
    }
}

impl PropertiesListRequest {
    /// Largest page size the API accepts, and the default.
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records per page. Values above 100 are rejected and leave
    /// the builder unchanged; there is no lower bound.
    pub fn per_page(&mut self, per_page: i64) -> Result<&mut Self, ApiError> {
        if per_page > Self::MAX_PER_PAGE {
            return Err(ApiError::Validation("per_page cannot exceed 100".to_string()));
        }
        self.per_page = per_page;
        Ok(self)
    }

    /// Zero-based page index.
    pub fn page(&mut self, page: i64) -> &mut Self {
        self.page = page;
        self
    }

    /// Content languages in lower case (fr, en, it, de), pipe-joined.
    pub fn lang<I, S>(&mut self, langs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lang = Some(join_langs(langs));
        self
    }

    /// Only properties updated after this date. The calendar date is taken
    /// in the value's own time zone.
    pub fn updated_after<D: Datelike>(&mut self, date: D) -> &mut Self {
        self.updated_after = Some(format_date(&date));
        self
    }

    /// Only properties updated before this date.
    pub fn updated_before<D: Datelike>(&mut self, date: D) -> &mut Self {
        self.updated_before = Some(format_date(&date));
        self
    }
}

fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

impl QueryParams for PropertiesListRequest {
    fn to_params(&self) -> Result<Params, ApiError> {
        let mut params = Params::new();
        params.insert("per_page".to_string(), Value::from(self.per_page));
        params.insert("page".to_string(), Value::from(self.page));

        if let Some(lang) = &self.lang {
            params.insert("lang".to_string(), Value::String(lang.clone()));
        }
        if let Some(after) = &self.updated_after {
            params.insert("update_date_min".to_string(), Value::String(after.clone()));
        }
        if let Some(before) = &self.updated_before {
            params.insert("update_date_max".to_string(), Value::String(before.clone()));
        }

        Ok(params)
    }
}
