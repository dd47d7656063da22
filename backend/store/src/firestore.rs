//! Firestore-backed record store, spoken over the Firestore REST API.
//!
//! Each plate is a document in the configured collection whose id is the
//! normalized plate. Fields are stored as Firestore typed values:
//! `patente` and `usuario` as `stringValue`, `estado` as `booleanValue`.

use std::collections::HashMap;

use async_trait::async_trait;
use patente_core::{PlateError, PlateRecord, RecordStore, Result, COLLECTION};
use patente_logging::redact_secrets;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";

/// Documents requested per listing round trip.
const LIST_PAGE_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

pub struct FirestoreRecordStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    collection: String,
    api_key: Option<String>,
}

impl FirestoreRecordStore {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: COLLECTION.to_string(),
            api_key: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    fn collection_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(storage_err)?;
        url.path_segments_mut()
            .map_err(|_| storage_err(format!("invalid firestore base url {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database.as_str(),
                "documents",
                self.collection.as_str(),
            ]);
        Ok(url)
    }

    /// Document URL with `key` percent-encoded as a single path segment, so
    /// `?`, `#` or `/` in a key cannot address another resource.
    fn document_url(&self, key: &str) -> Result<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| storage_err(format!("invalid firestore base url {}", self.base_url)))?
            .push(key);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<ListResponse> {
        let mut request = self
            .client
            .get(self.collection_url()?)
            .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        let resp = self
            .authorize(request)
            .send()
            .await
            .map_err(storage_err)?;
        let resp = check_status(resp).await?;
        resp.json::<ListResponse>()
            .await
            .map_err(storage_err)
    }
}

/// Storage error with credentials (the `key=` query parameter) scrubbed.
fn storage_err(err: impl std::fmt::Display) -> PlateError {
    PlateError::Storage(redact_secrets(&err.to_string()))
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(storage_err(format!("firestore returned {status}: {body}")))
}

#[async_trait]
impl RecordStore for FirestoreRecordStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn get(&self, key: &str) -> Result<Option<PlateRecord>> {
        let resp = self
            .authorize(self.client.get(self.document_url(key)?))
            .send()
            .await
            .map_err(storage_err)?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!(plate = %key, "Firestore document not found");
            return Ok(None);
        }
        let doc: Document = check_status(resp)
            .await?
            .json()
            .await
            .map_err(storage_err)?;
        Ok(Some(decode_fields(&doc.fields).with_key(key)))
    }

    async fn put(&self, key: &str, record: &PlateRecord) -> Result<()> {
        // PATCH without an update mask replaces the whole document, creating it if needed.
        let resp = self
            .authorize(self.client.patch(self.document_url(key)?))
            .json(&encode_record(record))
            .send()
            .await
            .map_err(storage_err)?;
        check_status(resp).await?;
        debug!(plate = %key, "Firestore document written");
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(String, PlateRecord)>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            for doc in page.documents {
                let key = key_from_name(&doc.name).to_string();
                let record = decode_fields(&doc.fields).with_key(&key);
                records.push((key, record));
            }
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        info!(count = records.len(), collection = %self.collection, "Firestore collection listed");
        Ok(records)
    }
}

/// Request body for writing a record.
pub fn encode_record(record: &PlateRecord) -> Value {
    json!({
        "fields": {
            "patente": { "stringValue": record.plate },
            "usuario": { "stringValue": record.user },
            "estado": { "booleanValue": record.linked },
        }
    })
}

/// Decode document fields, defaulting whatever is missing or mistyped.
pub fn decode_fields(fields: &HashMap<String, Value>) -> PlateRecord {
    let string_field = |name: &str| {
        fields
            .get(name)
            .and_then(|v| v["stringValue"].as_str())
            .unwrap_or_default()
            .to_string()
    };
    PlateRecord {
        plate: string_field("patente"),
        user: string_field("usuario"),
        linked: fields
            .get("estado")
            .and_then(|v| v["booleanValue"].as_bool())
            .unwrap_or(false),
    }
}

/// The document id is the last segment of its resource name.
pub fn key_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
