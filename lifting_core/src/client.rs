//! HTTP client for the Hevy routines API.
//!
//! All list endpoints share one pagination protocol: request page N, read
//! `page_count`, keep going until N reaches it. Mutations wrap their body
//! under a single resource key and the service echoes the resource back
//! under the same key.

use crate::routine::{ExerciseTemplate, Folder, Routine, RoutinePayload};
use crate::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com/v1";

const API_KEY_HEADER: &str = "api-key";
const TEMPLATES_PAGE_SIZE: u32 = 100;
const FOLDERS_PAGE_SIZE: u32 = 10;
const ROUTINES_PAGE_SIZE: u32 = 10;

/// Remote operations the sync needs
pub trait RoutineService {
    fn exercise_templates(&self) -> Result<Vec<ExerciseTemplate>>;
    fn folders(&self) -> Result<Vec<Folder>>;
    fn routines(&self) -> Result<Vec<Routine>>;
    fn create_folder(&self, title: &str) -> Result<Folder>;
    fn create_routine(&self, routine: &RoutinePayload) -> Result<Routine>;
    fn update_routine(&self, id: &str, routine: &RoutinePayload) -> Result<Routine>;
}

/// Blocking Hevy API client authenticated with an API key
pub struct HevyClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl HevyClient {
    /// Create a client against the production API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a different API root
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
    }

    /// Fetch every page of a list endpoint, collecting the items under `key`
    fn fetch_all<T: DeserializeOwned>(&self, path: &str, key: &str, page_size: u32) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = self.url(&format!("{}?page={}&pageSize={}", path, page, page_size));
            let response = self.authed(self.http.get(&url)).send()?;
            let body = check_status(response, &[StatusCode::OK])?;

            let mut value: Value = serde_json::from_str(&body)
                .map_err(|e| Error::Decode(format!("{} page {}: {}", path, page, e)))?;
            let page_count = value
                .get("page_count")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let batch: Vec<T> = match value.get_mut(key).map(Value::take) {
                Some(list) => serde_json::from_value(list)
                    .map_err(|e| Error::Decode(format!("{} page {}: {}", path, page, e)))?,
                None => Vec::new(),
            };

            tracing::debug!("Fetched {} {} from page {}/{}", batch.len(), key, page, page_count);
            items.extend(batch);

            if u64::from(page) >= page_count {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Send a wrapped JSON body and return the raw response text
    fn send_wrapped<B: Serialize>(
        &self,
        builder: RequestBuilder,
        key: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<String> {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(key.to_string(), serde_json::to_value(body)?);

        let response = self
            .authed(builder)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&wrapper)?)
            .send()?;
        check_status(response, accepted)
    }
}

/// Read the body and turn a non-accepted status into a `RemoteApi` error
fn check_status(response: Response, accepted: &[StatusCode]) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if accepted.contains(&status) {
        Ok(body)
    } else {
        Err(Error::RemoteApi {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pull `key` out of a JSON response body
fn unwrap_key<T: DeserializeOwned>(body: &str, key: &str) -> std::result::Result<T, String> {
    let mut value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| format!("missing \"{}\" in response", key))?;
    serde_json::from_value(inner).map_err(|e| e.to_string())
}

/// Decode an echoed routine, falling back to a title-only routine
fn routine_echo(body: &str, sent: &RoutinePayload) -> Routine {
    unwrap_key(body, "routine").unwrap_or_else(|e| {
        tracing::warn!(
            "Routine {:?} saved but response could not be decoded: {}",
            sent.title,
            e
        );
        Routine {
            title: sent.title.clone(),
            ..Routine::default()
        }
    })
}

impl RoutineService for HevyClient {
    fn exercise_templates(&self) -> Result<Vec<ExerciseTemplate>> {
        self.fetch_all("/exercise_templates", "exercise_templates", TEMPLATES_PAGE_SIZE)
    }

    fn folders(&self) -> Result<Vec<Folder>> {
        self.fetch_all("/routine_folders", "routine_folders", FOLDERS_PAGE_SIZE)
    }

    fn routines(&self) -> Result<Vec<Routine>> {
        self.fetch_all("/routines", "routines", ROUTINES_PAGE_SIZE)
    }

    fn create_folder(&self, title: &str) -> Result<Folder> {
        let body = serde_json::json!({ "title": title });
        let text = self.send_wrapped(
            self.http.post(self.url("/routine_folders")),
            "routine_folder",
            &body,
            &[StatusCode::OK, StatusCode::CREATED],
        )?;
        unwrap_key(&text, "routine_folder")
            .map_err(|e| Error::Decode(format!("folder response: {}", e)))
    }

    fn create_routine(&self, routine: &RoutinePayload) -> Result<Routine> {
        let text = self.send_wrapped(
            self.http.post(self.url("/routines")),
            "routine",
            routine,
            &[StatusCode::OK, StatusCode::CREATED],
        )?;
        Ok(routine_echo(&text, routine))
    }

    fn update_routine(&self, id: &str, routine: &RoutinePayload) -> Result<Routine> {
        let text = self.send_wrapped(
            self.http.put(self.url(&format!("/routines/{}", id))),
            "routine",
            routine,
            &[StatusCode::OK],
        )?;
        Ok(routine_echo(&text, routine))
    }
}
