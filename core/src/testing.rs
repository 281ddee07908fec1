//! Test doubles for the HTTP and sleep seams.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::traits::{HttpClient, HttpResponse, Sleeper};

/// Replays queued responses per URL. The last queued entry for a URL repeats;
/// unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, FetchError>>>>,
    requests: Mutex<Vec<String>>,
    headers: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: HttpResponse) {
        self.push(url, Ok(response));
    }

    pub fn respond_json(&self, url: &str, body: serde_json::Value) {
        self.respond(url, HttpResponse::new(200, body.to_string()));
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.push(url, Err(FetchError::Transport(message.to_string())));
    }

    fn push(&self, url: &str, entry: Result<HttpResponse, FetchError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(entry);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    pub fn last_headers(&self) -> Vec<(String, String)> {
        self.headers.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.headers.lock().unwrap().push(headers.to_vec());

        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(HttpResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
