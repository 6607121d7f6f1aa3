// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Ip2GeoClientError {
    #[error("callback can only be used when format is 'jsonp'")]
    CallbackWithoutJsonp,

    #[error("failed to send request to {url}: {source}")]
    RequestFailure {
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to decode received json response: {source}")]
    ResponseDecodeFailure { source: serde_json::Error },

    #[error("failed to build internal client: {source}")]
    ClientBuildFailure { source: reqwest::Error },

    #[error("provided api url ({raw}) is malformed: {source}")]
    MalformedApiUrl {
        raw: String,
        source: url::ParseError,
    },

    #[error("provided api url ({raw}) cannot be used as a base url")]
    CannotBeABaseUrl { raw: String },
}
