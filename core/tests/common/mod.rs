//! Scripted in-process transport shared by the core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use novaposhta_core::{
    ClientConfig, HttpRequest, HttpResponse, HttpTransport, NovaPoshtaClient, TransportError,
};
use serde_json::Value;

/// Replays queued responses in order and records every request it receives.
/// Running out of responses is reported as a transport failure.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(self, body: Value) -> Self {
        self.reply(Ok(HttpResponse::new(200, body.to_string())))
    }

    pub fn reply(self, reply: Result<HttpResponse, TransportError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `(modelName, calledMethod)` of every JSON call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .iter()
            .filter_map(|req| req.body.as_deref())
            .map(|body| {
                let v: Value = serde_json::from_str(body).unwrap();
                (
                    v["modelName"].as_str().unwrap().to_string(),
                    v["calledMethod"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    /// `methodProperties` of the n-th JSON call.
    pub fn props(&self, n: usize) -> Value {
        let req = &self.requests()[n];
        let v: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        v["methodProperties"].clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply")))
    }
}

pub fn client(transport: &ScriptedTransport) -> NovaPoshtaClient<&ScriptedTransport> {
    NovaPoshtaClient::new(transport, ClientConfig::new("test-key"))
}
