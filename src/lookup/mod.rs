// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::Ip2GeoClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// Response representation requested from the API. It only drives how the
/// client treats the received body; the server decides what it actually sends.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
    Yaml,
    Jsonp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Jsonp => "jsonp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single lookup. An absent (or empty) ip asks the API to
/// locate the address the request originated from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    ip: Option<String>,
    format: Option<OutputFormat>,
    callback: Option<String>,
}

impl LookupRequest {
    pub fn new() -> Self {
        LookupRequest::default()
    }

    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub(crate) fn expects_json(&self) -> bool {
        matches!(self.format, None | Some(OutputFormat::Json))
    }

    // callback is a jsonp-only parameter. checked before anything is sent
    // so that a misuse never reaches the network.
    pub(crate) fn validate(&self) -> Result<(), Ip2GeoClientError> {
        if self.callback.is_some() && self.format != Some(OutputFormat::Jsonp) {
            return Err(Ip2GeoClientError::CallbackWithoutJsonp);
        }
        Ok(())
    }

    /// Construct the request url for this lookup: the api url, followed by the
    /// percent-encoded ip as an extra path segment (when one was provided),
    /// followed by the `key` / `format` / `callback` query parameters in
    /// standard form-urlencoded form. Parameter order carries no meaning.
    pub(crate) fn build_url(
        &self,
        api_url: &Url,
        api_key: &str,
    ) -> Result<Url, Ip2GeoClientError> {
        let mut url = api_url.clone();

        if let Some(ip) = self.ip.as_deref().filter(|ip| !ip.is_empty()) {
            url.path_segments_mut()
                .map_err(|_| Ip2GeoClientError::CannotBeABaseUrl {
                    raw: api_url.to_string(),
                })?
                .push(ip);
        }

        if !api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", api_key);
        }
        if let Some(format) = self.format {
            url.query_pairs_mut().append_pair("format", format.as_str());
        }
        if let Some(callback) = &self.callback {
            url.query_pairs_mut().append_pair("callback", callback);
        }

        Ok(url)
    }
}

impl From<&str> for LookupRequest {
    fn from(ip: &str) -> Self {
        LookupRequest::new().ip(ip)
    }
}

impl From<String> for LookupRequest {
    fn from(ip: String) -> Self {
        LookupRequest::new().ip(ip)
    }
}

impl<S> From<(S, OutputFormat)> for LookupRequest
where
    S: Into<String>,
{
    fn from((ip, format): (S, OutputFormat)) -> Self {
        LookupRequest::new().ip(ip).format(format)
    }
}

/// Outcome of a successful exchange. The API does not publish a response
/// schema, so json bodies are exposed as an open mapping and every other
/// format as the verbatim body text.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    Json(Map<String, Value>),
    Raw(String),
}

impl LookupResponse {
    pub fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            LookupResponse::Json(fields) => Some(fields),
            LookupResponse::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            LookupResponse::Json(_) => None,
            LookupResponse::Raw(body) => Some(body),
        }
    }

    pub fn into_json(self) -> Option<Map<String, Value>> {
        match self {
            LookupResponse::Json(fields) => Some(fields),
            LookupResponse::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<String> {
        match self {
            LookupResponse::Json(_) => None,
            LookupResponse::Raw(body) => Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn api_url() -> Url {
        "https://api.ip2geoapi.com/ip".parse().unwrap()
    }

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn absent_ip_leaves_the_base_path_untouched() {
        let url = LookupRequest::new().build_url(&api_url(), "").unwrap();
        assert_eq!(url.path(), "/ip");
        assert_eq!(url.query(), None);

        let url = LookupRequest::new()
            .ip("")
            .build_url(&api_url(), "")
            .unwrap();
        assert_eq!(url.path(), "/ip");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn ip_becomes_an_extra_path_segment() {
        let url = LookupRequest::new()
            .ip("1.2.3.4")
            .build_url(&api_url(), "")
            .unwrap();
        assert_eq!(url.path(), "/ip/1.2.3.4");
    }

    #[test]
    fn ip_segment_is_percent_encoded() {
        let url = LookupRequest::new()
            .ip("münchen?")
            .build_url(&api_url(), "")
            .unwrap();
        assert_eq!(url.path(), "/ip/m%C3%BCnchen%3F");
    }

    #[test]
    fn api_key_appears_only_when_non_empty() {
        let url = LookupRequest::new()
            .ip("1.2.3.4")
            .build_url(&api_url(), "sekret")
            .unwrap();
        assert_eq!(query_map(&url).get("key").map(String::as_str), Some("sekret"));

        let url = LookupRequest::new()
            .ip("1.2.3.4")
            .build_url(&api_url(), "")
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn format_and_callback_are_passed_as_query_parameters() {
        let url = LookupRequest::new()
            .format(OutputFormat::Jsonp)
            .callback("handle_geo")
            .build_url(&api_url(), "sekret")
            .unwrap();

        let params = query_map(&url);
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("key").map(String::as_str), Some("sekret"));
        assert_eq!(params.get("format").map(String::as_str), Some("jsonp"));
        assert_eq!(params.get("callback").map(String::as_str), Some("handle_geo"));
    }

    #[test]
    fn query_values_are_form_urlencoded() {
        let url = LookupRequest::new()
            .format(OutputFormat::Jsonp)
            .callback("my callback ü")
            .build_url(&api_url(), "")
            .unwrap();
        assert!(url.query().unwrap().contains("callback=my+callback+%C3%BC"));
    }

    #[test]
    fn callback_requires_jsonp_format() {
        assert!(matches!(
            LookupRequest::new().callback("cb").validate(),
            Err(Ip2GeoClientError::CallbackWithoutJsonp)
        ));
        assert!(matches!(
            LookupRequest::new()
                .format(OutputFormat::Xml)
                .callback("cb")
                .validate(),
            Err(Ip2GeoClientError::CallbackWithoutJsonp)
        ));
        assert!(LookupRequest::new()
            .format(OutputFormat::Jsonp)
            .callback("cb")
            .validate()
            .is_ok());
        assert!(LookupRequest::new().validate().is_ok());
    }

    #[test]
    fn only_json_expects_decoding() {
        assert!(LookupRequest::new().expects_json());
        assert!(LookupRequest::new().format(OutputFormat::Json).expects_json());
        assert!(!LookupRequest::new().format(OutputFormat::Xml).expects_json());
        assert!(!LookupRequest::new().format(OutputFormat::Yaml).expects_json());
        assert!(!LookupRequest::new().format(OutputFormat::Jsonp).expects_json());
    }

    #[test]
    fn requests_can_be_built_from_plain_ips() {
        assert_eq!(
            LookupRequest::from("1.2.3.4"),
            LookupRequest::new().ip("1.2.3.4")
        );
        assert_eq!(
            LookupRequest::from(("1.2.3.4", OutputFormat::Yaml)),
            LookupRequest::new().ip("1.2.3.4").format(OutputFormat::Yaml)
        );
    }

    #[test]
    fn response_accessors_follow_the_variant() {
        let mut fields = Map::new();
        fields.insert("country".to_string(), Value::String("US".to_string()));
        let json = LookupResponse::Json(fields.clone());
        let raw = LookupResponse::Raw("<response/>".to_string());

        assert_eq!(json.as_json(), Some(&fields));
        assert_eq!(json.as_raw(), None);
        assert_eq!(raw.as_json(), None);
        assert_eq!(raw.as_raw(), Some("<response/>"));

        assert_eq!(json.into_json(), Some(fields));
        assert_eq!(raw.into_raw().as_deref(), Some("<response/>"));
    }

    #[test]
    fn format_string_forms() {
        assert_eq!(OutputFormat::Json.as_str(), "json");
        assert_eq!(OutputFormat::Jsonp.to_string(), "jsonp");
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
