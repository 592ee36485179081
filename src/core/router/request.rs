//! HTTP-shaped requests
//!
//! An [`ApiRequest`] is what a console screen would have sent over the wire: a method, a
//! path with an optional query string, and an optional JSON body.

use crate::core::store::ListQuery;
use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read
    Get,
    /// Create
    Post,
    /// Update
    Put,
    /// Delete
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this method may change the store
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!(
                "Unsupported method '{other}'. Must be one of: GET, POST, PUT, DELETE"
            )),
        }
    }
}

/// A single call against the simulated API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request from a method and a target such as `/collection/users?search=ama`
    ///
    /// Query pairs are URL-decoded.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let query = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            method,
            path: path.to_string(),
            query,
            body: None,
        }
    }

    /// `GET` request
    pub fn get(target: &str) -> Self {
        Self::new(Method::Get, target)
    }

    /// `POST` request with a JSON body
    pub fn post(target: &str, body: Value) -> Self {
        Self::new(Method::Post, target).with_body(body)
    }

    /// `PUT` request with a JSON body
    pub fn put(target: &str, body: Value) -> Self {
        Self::new(Method::Put, target).with_body(body)
    }

    /// `DELETE` request
    pub fn delete(target: &str) -> Self {
        Self::new(Method::Delete, target)
    }

    /// Attaches a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Request method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Last value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn query_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.query_param(name))
    }

    /// Deserializes the body into a create or patch input
    ///
    /// A missing body is treated as an empty object, so required-field checks still report
    /// which field is missing.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if the body has the wrong shape.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()));
        serde_json::from_value(body)
            .map_err(|e| WardroomError::validation(format!("invalid request body: {e}")))
    }

    /// Builds the list query from the query string
    ///
    /// Recognised keys: `search` (or `q`), `page`, `pageSize` (or `page_size`), `limit`,
    /// `offset`, `start`, `end`. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for malformed numbers or dates, zero-sized pages and inverted
    /// windows.
    pub fn list_query(&self) -> Result<ListQuery> {
        let query = ListQuery {
            search: self
                .query_any(&["search", "q"])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            page: parse_number(self.query_param("page"), "page")?,
            page_size: parse_number(self.query_any(&["pageSize", "page_size"]), "pageSize")?,
            limit: parse_number(self.query_param("limit"), "limit")?,
            offset: parse_number(self.query_param("offset"), "offset")?,
            start: parse_bound(self.query_param("start"), "start", Bound::Start)?,
            end: parse_bound(self.query_param("end"), "end", Bound::End)?,
        };
        query.validate()?;
        Ok(query)
    }
}

fn parse_number(raw: Option<&str>, name: &str) -> Result<Option<usize>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse().map(Some).map_err(|_| {
            WardroomError::validation(format!(
                "{name} must be a non-negative integer, got '{value}'"
            ))
        }),
        None => Ok(None),
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date
///
/// A bare `end` date covers the whole day.
fn parse_bound(raw: Option<&str>, name: &str, bound: Bound) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        WardroomError::validation(format!(
            "{name} must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{value}'"
        ))
    })?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| WardroomError::validation("invalid end-of-day time"))?,
    };
    Ok(Some(date.and_time(time).and_utc()))
}
