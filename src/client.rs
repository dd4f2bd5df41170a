use crate::models::{Collection, Record, RecordFields};
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://my.living-apps.de/rest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("invalid records base url {0}")]
    InvalidBaseUrl(String),
    #[error("request to records backend failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("records backend answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// CRUD access to the hosted-records backend.
///
/// Authentication rides on the backend's session cookie, which is forwarded
/// verbatim when configured.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    http: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl RecordsClient {
    pub fn new(base_url: &str, session_cookie: Option<String>) -> Result<Self, RecordsError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| RecordsError::InvalidBaseUrl(base_url.clone()))?;

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url,
            session_cookie,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list<F>(&self) -> Result<Vec<Record<F>>, RecordsError>
    where
        F: RecordFields + DeserializeOwned + Default,
    {
        let url = self.collection_url(F::COLLECTION);
        let list: RecordList<F> = self.send(self.request(Method::GET, &url)).await?.json().await?;
        info!(
            collection = F::COLLECTION.name(),
            count = list.0.len(),
            "loaded records"
        );
        Ok(list.0)
    }

    pub async fn get<F>(&self, record_id: &str) -> Result<Record<F>, RecordsError>
    where
        F: RecordFields + DeserializeOwned + Default,
    {
        let url = self.record_url(F::COLLECTION, record_id);
        let mut record: Record<F> = self.send(self.request(Method::GET, &url)).await?.json().await?;
        if record.record_id.is_empty() {
            record.record_id = record_id.to_string();
        }
        Ok(record)
    }

    /// Creates a record and returns its id when the backend reports one.
    pub async fn create<F>(&self, fields: &F) -> Result<Option<String>, RecordsError>
    where
        F: RecordFields + Serialize,
    {
        let url = self.collection_url(F::COLLECTION);
        let builder = self.request(Method::POST, &url).json(&FieldsBody { fields });
        let text = self.send(builder).await?.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        let record_id = created_record_id(&body);
        info!(
            collection = F::COLLECTION.name(),
            record_id = record_id.as_deref().unwrap_or("-"),
            "created record"
        );
        Ok(record_id)
    }

    /// Sends only the fields that are set; the backend keeps the rest.
    pub async fn update<F>(&self, record_id: &str, fields: &F) -> Result<(), RecordsError>
    where
        F: RecordFields + Serialize,
    {
        let url = self.record_url(F::COLLECTION, record_id);
        let builder = self.request(Method::PATCH, &url).json(&FieldsBody { fields });
        self.send(builder).await?;
        info!(collection = F::COLLECTION.name(), record_id, "updated record");
        Ok(())
    }

    pub async fn delete(&self, collection: Collection, record_id: &str) -> Result<(), RecordsError> {
        let url = self.record_url(collection, record_id);
        self.send(self.request(Method::DELETE, &url)).await?;
        info!(collection = collection.name(), record_id, "deleted record");
        Ok(())
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/apps/{}/records", self.base_url, collection.app_id())
    }

    fn record_url(&self, collection: Collection, record_id: &str) -> String {
        format!("{}/{record_id}", self.collection_url(collection))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match &self.session_cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RecordsError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecordsError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// The trailing 24 hex characters of a record URL.
pub fn extract_record_id(url: &str) -> Option<&str> {
    let start = url.len().checked_sub(24)?;
    let tail = url.get(start..)?;
    tail.chars().all(|c| c.is_ascii_hexdigit()).then_some(tail)
}

pub fn record_url(app_id: &str, record_id: &str) -> String {
    format!("{DEFAULT_BASE_URL}/apps/{app_id}/records/{record_id}")
}

fn created_record_id(body: &serde_json::Value) -> Option<String> {
    match body {
        serde_json::Value::String(url) => extract_record_id(url).map(str::to_string),
        serde_json::Value::Object(map) => map
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .or_else(|| {
                map.get("url")
                    .and_then(|url| url.as_str())
                    .and_then(extract_record_id)
                    .map(str::to_string)
            }),
        _ => None,
    }
}

#[derive(Serialize)]
struct FieldsBody<'a, F> {
    fields: &'a F,
}

/// A list response: an object keyed by record id, kept in backend order.
struct RecordList<F>(Vec<Record<F>>);

impl<'de, F> Deserialize<'de> for RecordList<F>
where
    F: DeserializeOwned + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor<F>(PhantomData<F>);

        impl<'de, F> Visitor<'de> for ListVisitor<F>
        where
            F: DeserializeOwned + Default,
        {
            type Value = RecordList<F>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of records keyed by id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((record_id, mut record)) = map.next_entry::<String, Record<F>>()? {
                    record.record_id = record_id;
                    records.push(record);
                }
                Ok(RecordList(records))
            }
        }

        deserializer.deserialize_map(ListVisitor(PhantomData))
    }
}
