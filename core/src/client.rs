//! Request/response core of the Nova Poshta client.
//!
//! # Design
//! Every JSON operation goes through the same three steps:
//! `build_request` serializes the `{apiKey, modelName, calledMethod,
//! methodProperties}` envelope into an `HttpRequest`, the injected
//! `HttpTransport` executes it, and `parse_envelope` normalizes the provider's
//! `{success, data, errors}` answer into an `ApiResult`. The build and parse
//! halves are pure and public so they can be tested, or driven by a host that
//! performs its own I/O, without a transport.
//!
//! Operation methods live in `operations.rs` and `shipment.rs`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{ClientConfig, Language};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestEnvelope<'a> {
    api_key: &'a str,
    model_name: &'a str,
    called_method: &'a str,
    method_properties: &'a Value,
}

/// Synchronous client for the Nova Poshta JSON API.
///
/// Holds the configuration and the transport; no per-call state. Configuration
/// setters take `&mut self`, so they cannot race with a call in flight on the
/// same client.
#[derive(Debug, Clone)]
pub struct NovaPoshtaClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: HttpTransport> NovaPoshtaClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn limit(&self) -> u32 {
        self.config.limit
    }

    pub fn set_language(&mut self, language: Language) {
        self.config.language = language;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.config.limit = limit;
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    /// Serialize a method call into a POST against the JSON endpoint.
    ///
    /// `null` entries in `method_properties` are kept: the provider accepts
    /// explicit nulls for optional fields.
    pub fn build_request(
        &self,
        model_name: &str,
        called_method: &str,
        method_properties: &Value,
    ) -> ApiResult<HttpRequest> {
        let envelope = RequestEnvelope {
            api_key: &self.config.api_key,
            model_name,
            called_method,
            method_properties,
        };
        let body = serde_json::to_string(&envelope)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoints.json_url.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Normalize a provider response into rows or an error.
    pub fn parse_envelope(&self, response: HttpResponse) -> ApiResult<Vec<Value>> {
        parse_envelope(response)
    }

    /// Run one JSON exchange: build, send, normalize.
    pub fn execute(
        &self,
        model_name: &str,
        called_method: &str,
        method_properties: Value,
    ) -> ApiResult<Vec<Value>> {
        let request = self.build_request(model_name, called_method, &method_properties)?;
        tracing::debug!(model = model_name, method = called_method, "sending request");

        let response = self.transport.send(&request).map_err(|e| {
            tracing::warn!(model = model_name, method = called_method, error = %e, "transport failed");
            ApiError::Transport(e.to_string())
        })?;

        let result = parse_envelope(response);
        match &result {
            Ok(rows) => {
                tracing::debug!(model = model_name, method = called_method, rows = rows.len(), "request succeeded")
            }
            Err(e) => {
                tracing::warn!(model = model_name, method = called_method, error = %e, "request failed")
            }
        }
        result
    }

    /// GET request for the 100x100 zebra label PDF of the given documents.
    pub fn build_marking_request(&self, tracking_numbers: &[String]) -> HttpRequest {
        let url = format!(
            "{}/orders/printMarking100x100/orders/{}/type/pdf/zebra/zebra/apiKey/{}",
            self.config.endpoints.print_url.trim_end_matches('/'),
            tracking_numbers.join(","),
            self.config.api_key,
        );
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Label bytes on HTTP 200, `None` for any other status.
    pub fn parse_marking(&self, response: HttpResponse) -> Option<Vec<u8>> {
        (response.status == 200).then_some(response.body)
    }
}

fn parse_envelope(response: HttpResponse) -> ApiResult<Vec<Value>> {
    let status = response.status;
    let transport_ok = response.is_success();

    // Only a JSON object is an envelope; arrays and scalars carry no `success`.
    let mut envelope: Map<String, Value> = match serde_json::from_slice(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !transport_ok => return Err(ApiError::Transport(format!("HTTP {status}"))),
        Err(_) => return Err(ApiError::Malformed),
    };
    let errors = envelope.remove("errors").unwrap_or(Value::Null);
    let success = envelope.get("success").and_then(Value::as_bool);

    match success {
        Some(true) => match envelope.remove("data") {
            Some(Value::Array(rows)) if !rows.is_empty() => Ok(rows),
            _ => Err(ApiError::empty_result(error_messages(errors))),
        },
        Some(false) => Err(ApiError::rejected(error_messages(errors))),
        None if !transport_ok => Err(ApiError::Transport(format!("HTTP {status}"))),
        None => Err(ApiError::Malformed),
    }
}

/// The provider usually sends `errors` as a list of strings but has been seen
/// sending an object keyed by error code.
fn error_messages(errors: Value) -> Option<Vec<String>> {
    let to_message = |value: Value| match value {
        Value::String(s) => s,
        other => other.to_string(),
    };
    match errors {
        Value::Array(items) => Some(items.into_iter().map(to_message).collect()),
        Value::Object(map) => Some(map.into_iter().map(|(_, v)| to_message(v)).collect()),
        Value::String(s) => Some(vec![s]),
        _ => None,
    }
}
