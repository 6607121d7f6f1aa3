// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! A thin client for the ip2geoapi.com IP-geolocation API
//!
//! It builds the request url, performs a single GET exchange and hands the
//! body back either decoded (json) or verbatim (xml / yaml / jsonp). It is
//! transport-only: http status codes are never inspected and nothing is
//! retried or cached.
//!
//! ## Looking up an address
//!
//! ```rust
//! # use ip2geo_client::{Client, Ip2GeoClientError};
//! # use ip2geo_client::lookup::{LookupRequest, OutputFormat};
//! # async fn try_lookup() -> Result<(), Ip2GeoClientError> {
//!   let client = Client::new("your-api-key")?;
//!   // own address, decoded json
//!   let own = client.lookup_self().await?;
//!   // specific address, raw xml
//!   let raw = client
//!       .lookup(LookupRequest::new().ip("1.2.3.4").format(OutputFormat::Xml))
//!       .await?;
//! # Ok(())
//! # }
//! ```

use crate::error::Ip2GeoClientError;
use crate::lookup::{LookupRequest, LookupResponse};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::trace;
use url::Url;
use zeroize::Zeroizing;

pub const DEFAULT_API_URL: &str = "https://api.ip2geoapi.com/ip";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Covers the full exchange and applies independently of the connect timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_url: Option<String>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct Client {
    api_url: Url,

    api_key: Zeroizing<String>,

    inner_client: reqwest::Client,
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Client {
    pub fn new(api_key: impl Into<String>) -> Result<Self, Ip2GeoClientError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    pub fn new_with_config(config: ClientConfig) -> Result<Self, Ip2GeoClientError> {
        let mut builder = ClientBuilder::new(config.api_key);
        if let Some(api_url) = config.api_url {
            builder = builder.api_url(api_url);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.build()
    }

    /// Perform a single lookup exchange.
    ///
    /// Json-format lookups (the default) come back as an open mapping of the
    /// decoded body; everything else comes back verbatim. A non-2xx status is
    /// still a completed exchange and its body is processed as usual.
    pub async fn lookup(
        &self,
        request: impl Into<LookupRequest>,
    ) -> Result<LookupResponse, Ip2GeoClientError> {
        let request = request.into();
        request.validate()?;

        let url = request.build_url(&self.api_url, &self.api_key)?;
        trace!("looking up {url}");

        let response = self
            .inner_client
            .get(url.clone())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| Ip2GeoClientError::RequestFailure {
                url: url.to_string(),
                source,
            })?;

        let body = response
            .text()
            .await
            .map_err(|source| Ip2GeoClientError::RequestFailure {
                url: url.to_string(),
                source,
            })?;

        if request.expects_json() {
            let fields = serde_json::from_str(&body)
                .map_err(|source| Ip2GeoClientError::ResponseDecodeFailure { source })?;
            Ok(LookupResponse::Json(fields))
        } else {
            Ok(LookupResponse::Raw(body))
        }
    }

    /// Json lookup of a specific address.
    pub async fn lookup_ip(
        &self,
        ip: impl Into<String>,
    ) -> Result<LookupResponse, Ip2GeoClientError> {
        self.lookup(LookupRequest::new().ip(ip)).await
    }

    /// Json lookup of the address this request originates from.
    pub async fn lookup_self(&self) -> Result<LookupResponse, Ip2GeoClientError> {
        self.lookup(LookupRequest::new()).await
    }
}

pub struct ClientBuilder {
    api_key: Zeroizing<String>,
    api_url: String,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientBuilder {
            api_key: Zeroizing::new(api_key.into()),
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<Client, Ip2GeoClientError> {
        let api_url =
            Url::from_str(&self.api_url).map_err(|source| Ip2GeoClientError::MalformedApiUrl {
                raw: self.api_url.clone(),
                source,
            })?;
        if api_url.cannot_be_a_base() {
            return Err(Ip2GeoClientError::CannotBeABaseUrl { raw: self.api_url });
        }

        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        Ok(Client {
            api_url,
            api_key: self.api_key,
            inner_client: reqwest::ClientBuilder::new()
                .user_agent(user_agent)
                .connect_timeout(self.connect_timeout)
                .build()
                .map_err(|source| Ip2GeoClientError::ClientBuildFailure { source })?,
        })
    }
}
