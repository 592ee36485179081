//! Path patterns with `{name}` placeholders

use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route path such as `/collection/{hospital_id}/patients/{patient_id}`
///
/// Literal segments match exactly; `{name}` segments match any single non-empty segment and
/// capture it. Leading and trailing slashes are ignored on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl PathPattern {
    /// Parses a pattern
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();
        Self { segments }
    }

    /// Matches a concrete path, returning the captured parameters
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut params = RouteParams::default();
        let mut parts = split(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.values.insert(name.clone(), part.to_string());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => write!(f, "/{literal}")?,
                Segment::Param(name) => write!(f, "/{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// Parameters captured from a matched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: BTreeMap<String, String>,
}

impl RouteParams {
    /// Raw value of a captured parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parses a captured parameter into an id type
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if the parameter is missing or does not parse.
    pub fn id<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr<Err = String>,
    {
        let raw = self
            .get(name)
            .ok_or_else(|| WardroomError::validation(format!("missing path parameter '{name}'")))?;
        raw.parse()
            .map_err(|e| WardroomError::validation(format!("invalid {name}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HospitalId;

    #[test]
    fn test_literal_and_param_segments() {
        let pattern = PathPattern::parse("/collection/{hospital_id}/patients/{patient_id}");
        let params = pattern.matches("/collection/3/patients/7").unwrap();
        assert_eq!(params.get("hospital_id"), Some("3"));
        assert_eq!(params.get("patient_id"), Some("7"));
        assert_eq!(params.id::<HospitalId>("hospital_id").unwrap().as_str(), "3");
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let pattern = PathPattern::parse("/collection/hospitals");
        assert!(pattern.matches("/collection/hospitals/").is_some());
        assert!(pattern.matches("collection/hospitals").is_some());
    }

    #[test]
    fn test_segment_count_must_match() {
        let pattern = PathPattern::parse("/collection/hospitals/{id}");
        assert!(pattern.matches("/collection/hospitals").is_none());
        assert!(pattern.matches("/collection/hospitals/1/users").is_none());
        assert!(pattern.matches("/collection/roles/1").is_none());
    }

    #[test]
    fn test_display_round_trips_pattern() {
        let text = "/collection/{hospital_id}/clinicians";
        assert_eq!(PathPattern::parse(text).to_string(), text);
    }

    #[test]
    fn test_missing_param_is_validation_error() {
        let params = RouteParams::default();
        assert!(matches!(
            params.id::<HospitalId>("id"),
            Err(WardroomError::ValidationFailed(_))
        ));
    }
}
