// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod client;
pub mod error;
pub mod lookup;

pub use client::{Client, ClientBuilder, ClientConfig, DEFAULT_API_URL};
pub use error::Ip2GeoClientError;
pub use lookup::{LookupRequest, LookupResponse, OutputFormat};
