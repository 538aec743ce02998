//! Test doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::transport::{HttpResponse, Transport, Validators};
use crate::error::Result;

/// In-memory transport. Each URL replays its scripted responses in order and
/// then keeps repeating the last one. Unknown URLs answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    log: Mutex<Vec<(String, Option<Validators>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: HttpResponse) {
        self.script(url, vec![response]);
    }

    pub fn respond_json(&self, url: &str, body: serde_json::Value) {
        self.respond(url, HttpResponse::new(StatusCode::OK, body.to_string()));
    }

    pub fn script(&self, url: &str, responses: Vec<HttpResponse>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
    }

    pub fn total_requests(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn requests_to(&self, url: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|(u, _)| u == url).count()
    }

    /// Validators sent with the most recent request to `url`.
    pub fn last_conditional(&self, url: &str) -> Option<Validators> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .and_then(|(_, v)| v.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, conditional: Option<&Validators>) -> Result<HttpResponse> {
        self.log
            .lock()
            .unwrap()
            .push((url.to_string(), conditional.cloned()));

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| HttpResponse::new(StatusCode::NOT_FOUND, "Not Found")))
    }
}
