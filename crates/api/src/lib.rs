//! Open Supply Hub API client.
//!
//! This crate provides a lightweight client for the Open Supply Hub
//! registry API. It focuses on:
//!
//! - Resolving a credential once, at construction time (see [`credentials`])
//! - Validating `OSH_URL` for safety before any request is built
//! - Building requests with a consistent User-Agent and Accept headers
//! - Validating input parameters against each resource's schema before
//!   dispatch, and normalizing JSON-LD responses into flat records
//!
//! The primary entry point is [`OshClient`]. Create an instance via
//! [`OshClient::new`], then fetch mapped records with [`OshClient::fetch`]
//! or run the validate/map pipeline over an already-obtained payload with
//! [`OshClient::validate_and_map`].
//!
//! # Example
//!
//! ```ignore
//! use osh_api::{ClientConfig, OshClient};
//!
//! fn main() -> Result<(), osh_types::Error> {
//!     let client = OshClient::new(ClientConfig::default())?;
//!     let page = client.fetch("contributor_lists", &serde_json::json!({"contributor_id": 42}))?;
//!     for record in &page.records {
//!         println!("{:?}", record.get("list_name"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod credentials;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use osh_registry::ResourceRegistry;
use osh_types::{Error, FlatRecord};
use osh_util::redact_sensitive;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, Url, header};
use serde_json::{Map, Value};
use tracing::debug;

pub use credentials::{Credential, TOKEN_ENV_VAR, resolve};

/// Allowed hostnames or base domains for non-local configurations of
/// `OSH_URL`. Subdomains of these domains are also allowed.
const ALLOWED_OSH_DOMAINS: &[&str] = &["opensupplyhub.org", "os-hub.net"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "OSH_URL";
/// Default public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://opensupplyhub.org";

/// Construction-time options for [`OshClient`].
///
/// Every field defaults to "not provided": the base URL falls back to
/// `OSH_URL` or the public endpoint, and the credential is resolved through
/// the standard precedence chain.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL override; beats `OSH_URL` and the default endpoint.
    pub base_url: Option<String>,
    /// Explicit token; beats the settings file and the environment.
    pub token: Option<String>,
    /// Path to a YAML settings file with a `token:` entry.
    pub settings_path: Option<PathBuf>,
    /// Environment variable to consult last; `None` means
    /// [`credentials::TOKEN_ENV_VAR`].
    pub token_env_var: Option<String>,
}

/// One page of mapped records, with the page boundaries the API reported.
///
/// The client exposes the boundary cursors but never follows them itself;
/// pagination traversal belongs to the caller.
#[derive(Debug, Clone)]
pub struct Page {
    /// The mapped records, in source order.
    pub records: Vec<FlatRecord>,
    /// URL of the next page, when the API reported one.
    pub next: Option<String>,
    /// URL of the previous page, when the API reported one.
    pub previous: Option<String>,
}

/// Thin wrapper around a configured `reqwest` client for registry access.
///
/// The client pre-configures default headers (including the resolved
/// credential) and builds requests against a validated base URL. The
/// credential and the resource registry are immutable after construction,
/// so a client is safe to share across threads for reads.
#[derive(Debug)]
pub struct OshClient {
    base_url: String,
    http: Client,
    credential: Credential,
    registry: ResourceRegistry,
    user_agent: String,
}

impl OshClient {
    /// Construct a client with the built-in resource registry.
    ///
    /// Credential resolution happens here, once; failure to find a usable
    /// token is fatal to construction. The base URL is taken from the
    /// config, then `OSH_URL`, then the default public endpoint, and must
    /// pass [`validate_base_url`].
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let registry = ResourceRegistry::builtin()?;
        Self::with_registry(config, registry)
    }

    /// Construct a client over a caller-supplied registry.
    pub fn with_registry(config: ClientConfig, registry: ResourceRegistry) -> Result<Self, Error> {
        let credential = credentials::resolve(
            config.token.as_deref(),
            config.settings_path.as_deref(),
            config.token_env_var.as_deref(),
        )?;

        let base_url = config
            .base_url
            .or_else(|| env::var(BASE_URL_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let mut authorization = header::HeaderValue::from_str(&format!("Token {}", credential.reveal()))
            .map_err(|_| Error::Configuration {
                detail: "credential contains characters not permitted in an HTTP header".into(),
            })?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|error| Error::Configuration {
                detail: format!("failed to build HTTP client: {error}"),
            })?;

        Ok(Self {
            base_url,
            http,
            credential,
            registry,
            user_agent: format!("osh-client/0.1; {}", env::consts::OS),
        })
    }

    /// The credential resolved at construction time.
    pub fn get_credential(&self) -> &Credential {
        &self.credential
    }

    /// The registry this client resolves resource names against.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The validated base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a `RequestBuilder` for a method and API-relative path.
    ///
    /// The resulting request includes the configured User-Agent and the
    /// default headers, and is resolved relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    /// Run the validate/map pipeline over an already-obtained payload.
    ///
    /// Looks the resource up, validates `params` against its input schema,
    /// and maps `raw_response` through its context. Errors keep their kind
    /// and gain the resource name in their detail.
    pub fn validate_and_map(&self, resource_name: &str, params: &Value, raw_response: &Value) -> Result<Vec<FlatRecord>, Error> {
        let descriptor = self.registry.lookup(resource_name)?;
        let params = params_object(params)?;
        osh_util::validation::validate_params(descriptor, params).map_err(|error| error.in_resource(resource_name))?;
        osh_util::jsonld::map_payload(descriptor, raw_response).map_err(|error| error.in_resource(resource_name))
    }

    /// Validate parameters, issue the GET, and map the response.
    ///
    /// Upstream failures are passed through as [`Error::Upstream`] with the
    /// original status and detail (a transport failure that produced no HTTP
    /// status is surfaced with status `0`); they are never reinterpreted as
    /// mapping or validation failures. Page-boundary cursors reported by the
    /// API are exposed on the returned [`Page`] but not followed.
    pub fn fetch(&self, resource_name: &str, params: &Value) -> Result<Page, Error> {
        let descriptor = self.registry.lookup(resource_name)?;
        let params = params_object(params)?;
        osh_util::validation::validate_params(descriptor, params).map_err(|error| error.in_resource(resource_name))?;

        let mut url = Url::parse(&format!("{}{}", self.base_url, descriptor.path)).map_err(|error| Error::Configuration {
            detail: format!("invalid request URL for resource '{resource_name}': {error}"),
        })?;
        append_query_params(&mut url, params);
        debug!(%url, resource = resource_name, "dispatching request");

        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .map_err(|error| Error::Upstream {
                status: error.status().map(|status| status.as_u16()).unwrap_or(0),
                detail: redact_sensitive(&error.to_string()),
            })
            .map_err(|error| error.in_resource(resource_name))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                detail: redact_sensitive(&body),
            }
            .in_resource(resource_name));
        }

        let payload: Value = serde_json::from_str(&body).map_err(|error| {
            Error::Mapping {
                detail: format!("response body is not valid JSON: {error}"),
            }
            .in_resource(resource_name)
        })?;

        let (next, previous) = page_boundaries(&payload);
        let records = osh_util::jsonld::map_payload(descriptor, &payload).map_err(|error| error.in_resource(resource_name))?;
        Ok(Page { records, next, previous })
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be one of the allowed
///   registry domains or a subdomain thereof
pub fn validate_base_url(base: &str) -> Result<(), Error> {
    let parsed = Url::parse(base).map_err(|error| Error::Configuration {
        detail: format!("invalid OSH_URL '{base}': {error}"),
    })?;

    let host = parsed.host_str().ok_or_else(|| Error::Configuration {
        detail: "OSH_URL must include a host".into(),
    })?;

    if LOCALHOST_DOMAINS.iter().any(|&allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(Error::Configuration {
            detail: format!("OSH_URL must use https for non-localhost hosts; got '{}://'", parsed.scheme()),
        });
    }

    let is_allowed_domain = ALLOWED_OSH_DOMAINS
        .iter()
        .any(|&domain| host.eq_ignore_ascii_case(domain) || host.ends_with(&format!(".{domain}")));
    if !is_allowed_domain {
        return Err(Error::Configuration {
            detail: format!("OSH_URL host '{host}' is not allowed; must be one of {ALLOWED_OSH_DOMAINS:?} or a subdomain, or localhost"),
        });
    }

    Ok(())
}

/// Parameters must arrive as a JSON object; anything else is a validation
/// failure, not something to coerce.
fn params_object(params: &Value) -> Result<&Map<String, Value>, Error> {
    params.as_object().ok_or_else(|| Error::Validation {
        field: "(parameters)".into(),
        detail: "parameters must be a JSON object".into(),
    })
}

/// Append validated parameters as URL query pairs.
///
/// Scalars are rendered directly; structured values (such as a GeoJSON
/// boundary) are rendered as compact JSON. Nulls are dropped. Encoding is
/// handled by the URL's own query serializer.
fn append_query_params(url: &mut Url, params: &Map<String, Value>) {
    let mut pairs = url.query_pairs_mut();
    for (name, value) in params {
        let rendered = match value {
            Value::Null => continue,
            Value::String(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            structured => serde_json::to_string(structured).unwrap_or_default(),
        };
        pairs.append_pair(name, &rendered);
    }
}

/// Pull the page-boundary cursors out of a paginated payload, if present.
fn page_boundaries(payload: &Value) -> (Option<String>, Option<String>) {
    let cursor = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);
    (cursor("next"), cursor("previous"))
}
