//! Parameter binding.
//!
//! # Responsibilities
//! - Hold the request's named values (query string, form body)
//! - Produce the entry point's arguments in declared order
//!
//! # Design Decisions
//! - Query string values win over form body values of the same name
//! - A name repeated within one source resolves to its last occurrence
//! - Form bodies are only consulted for non-GET verbs (the host never reads
//!   a GET body)

use url::form_urlencoded;

use crate::error::BindingError;
use crate::routing::ParameterSpec;
use crate::service::Value;

/// Named request values, as read from the listener.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (undecoded) query string, without the leading `?`.
    pub fn from_query(query: Option<&str>) -> Self {
        Self {
            query: query.map(|q| parse_pairs(q.as_bytes())).unwrap_or_default(),
            form: Vec::new(),
        }
    }

    /// Attach an `application/x-www-form-urlencoded` body.
    pub fn with_form(mut self, body: &[u8]) -> Self {
        self.form = parse_pairs(body);
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Value for `name`: query string first, then form body.
    pub fn get(&self, name: &str) -> Option<&str> {
        last_value(&self.query, name).or_else(|| last_value(&self.form, name))
    }
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input).into_owned().collect()
}

fn last_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rfind(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Convert the request's values into arguments, in declared order.
pub fn bind(parameters: &[ParameterSpec], request: &RequestParams) -> Result<Vec<Value>, BindingError> {
    parameters
        .iter()
        .map(|spec| {
            let raw = request
                .get(&spec.name)
                .ok_or_else(|| BindingError::Missing(spec.name.clone()))?;
            spec.kind.parse(raw).ok_or_else(|| BindingError::Invalid {
                name: spec.name.clone(),
                kind: spec.kind,
                value: raw.to_string(),
            })
        })
        .collect()
}
