//! Supabase storage
//!
//! Forwards every operation as a single HTTP call to the hosted `guestbook`
//! table, through its PostgREST interface. The table enforces ordering and
//! uniqueness, this backend only translates calls and errors.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Client;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::entries::Entry;

use super::CreateEntryValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateEntryValues;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mutations only return the affected rows when asked to
const PREFER_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

/// Storage backed by a hosted Supabase table
#[derive(Clone)]
pub struct Supabase {
    /// Shared HTTP client, carries the key on every request
    client: Client,

    /// Full URL of the `guestbook` table resource
    table_url: String,
}

/// A single row of the remote `guestbook` table
#[derive(Debug, Deserialize)]
struct Row {
    id: Uuid,
    name: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl Row {
    fn into_entry(self) -> Entry {
        Entry {
            id: self.id,
            name: self.name,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

/// Body of an insert, the table fills in the rest
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    name: &'a str,
    message: &'a str,
}

/// Body of a partial update, absent fields are left untouched
#[derive(Debug, Serialize)]
struct PatchRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a String>,
}

impl Supabase {
    /// Create a new Supabase storage
    ///
    /// The key is attached to every request, both as `apikey` and as bearer
    /// token
    ///
    /// # Errors
    ///
    /// Will return `Err` when the key is not a valid header value, or the
    /// client can not be built
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        auth_value.set_sensitive(true);

        let mut api_key_value = HeaderValue::from_str(api_key)?;
        api_key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth_value);
        headers.insert("apikey", api_key_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/guestbook", base_url.trim_end_matches('/')),
        })
    }

    /// Send a request and read back the affected rows
    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<Entry>> {
        let response = request.send().await.map_err(upstream_error)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(Error::Upstream(format!("status {status}: {body}")));
        }

        let rows = response.json::<Vec<Row>>().await.map_err(upstream_error)?;

        Ok(rows.into_iter().map(Row::into_entry).collect())
    }
}

#[async_trait]
impl Storage for Supabase {
    async fn find_all_entries(&self) -> Result<Vec<Entry>> {
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        self.fetch_rows(request).await
    }

    async fn create_entry(&self, values: &CreateEntryValues<'_>) -> Result<Entry> {
        let rows = [InsertRow {
            name: values.name,
            message: values.message,
        }];

        let request = self
            .client
            .post(&self.table_url)
            .query(&[("select", "*")])
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
            .json(&rows);

        self.fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("insert returned no rows".to_string()))
    }

    async fn update_entry(
        &self,
        id: &Uuid,
        values: &UpdateEntryValues<'_>,
    ) -> Result<Option<Entry>> {
        let id_filter = format!("eq.{id}");

        let patch = PatchRow {
            name: values.name,
            message: values.message,
        };

        let request = self
            .client
            .patch(&self.table_url)
            .query(&[("id", id_filter.as_str()), ("select", "*")])
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
            .json(&patch);

        // an unknown ID matches no rows, which is not an error upstream
        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn delete_entry(&self, id: &Uuid) -> Result<Option<Entry>> {
        let id_filter = format!("eq.{id}");

        let request = self
            .client
            .delete(&self.table_url)
            .query(&[("id", id_filter.as_str()), ("select", "*")])
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1);

        Ok(self.fetch_rows(request).await?.into_iter().next())
    }
}

/// Convert any transport or parse error to an upstream storage error
fn upstream_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Upstream(err.to_string())
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn row_body(id: &Uuid, name: &str, message: &str) -> String {
        json!([{
            "id": id,
            "name": name,
            "message": message,
            "created_at": "2026-08-01T10:00:00+00:00",
        }])
        .to_string()
    }

    fn storage_for(server: &mockito::ServerGuard) -> Supabase {
        Supabase::new(&server.url(), "test-key").unwrap()
    }

    #[tokio::test]
    async fn test_find_all_entries() {
        let mut server = mockito::Server::new_async().await;

        let id = Uuid::new_v4();
        let mock = server
            .mock("GET", "/rest/v1/guestbook")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_header("content-type", "application/json")
            .with_body(row_body(&id, "Alice", "Hi"))
            .create_async()
            .await;

        let storage = storage_for(&server);
        let entries = storage.find_all_entries().await.unwrap();

        mock.assert_async().await;
        assert_eq!(1, entries.len());
        assert_eq!(id, entries[0].id);
        assert_eq!("Alice", entries[0].name);
        assert_eq!("Hi", entries[0].message);
    }

    #[tokio::test]
    async fn test_create_entry() {
        let mut server = mockito::Server::new_async().await;

        let id = Uuid::new_v4();
        let mock = server
            .mock("POST", "/rest/v1/guestbook")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(json!([{"name": "Alice", "message": "Hi"}])))
            .with_header("content-type", "application/json")
            .with_body(row_body(&id, "Alice", "Hi"))
            .create_async()
            .await;

        let storage = storage_for(&server);
        let values = CreateEntryValues {
            name: "Alice",
            message: "Hi",
        };
        let entry = storage.create_entry(&values).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, entry.id);
        assert_eq!("Alice", entry.name);
    }

    #[tokio::test]
    async fn test_update_entry_sends_only_supplied_fields() {
        let mut server = mockito::Server::new_async().await;

        let id = Uuid::new_v4();
        let mock = server
            .mock("PATCH", "/rest/v1/guestbook")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), format!("eq.{id}")),
                Matcher::UrlEncoded("select".into(), "*".into()),
            ]))
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(json!({"message": "Bye"})))
            .with_header("content-type", "application/json")
            .with_body(row_body(&id, "Alice", "Bye"))
            .create_async()
            .await;

        let storage = storage_for(&server);
        let message = "Bye".to_string();
        let values = UpdateEntryValues {
            name: None,
            message: Some(&message),
        };
        let entry = storage.update_entry(&id, &values).await.unwrap();

        mock.assert_async().await;
        let entry = entry.unwrap();
        assert_eq!("Bye", entry.message);
        assert_eq!("Alice", entry.name);
    }

    #[tokio::test]
    async fn test_update_entry_unknown_id_is_none() {
        let mut server = mockito::Server::new_async().await;

        let id = Uuid::new_v4();
        let _mock = server
            .mock("PATCH", "/rest/v1/guestbook")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let storage = storage_for(&server);
        let name = "Nobody".to_string();
        let values = UpdateEntryValues {
            name: Some(&name),
            message: None,
        };
        let entry = storage.update_entry(&id, &values).await.unwrap();

        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let mut server = mockito::Server::new_async().await;

        let id = Uuid::new_v4();
        let mock = server
            .mock("DELETE", "/rest/v1/guestbook")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), format!("eq.{id}")),
                Matcher::UrlEncoded("select".into(), "*".into()),
            ]))
            .match_header("prefer", "return=representation")
            .with_header("content-type", "application/json")
            .with_body(row_body(&id, "Alice", "Hi"))
            .create_async()
            .await;

        let storage = storage_for(&server);
        let entry = storage.delete_entry(&id).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, entry.unwrap().id);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_propagated() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/rest/v1/guestbook")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let storage = storage_for(&server);
        let error = storage.find_all_entries().await.unwrap_err();

        let Error::Upstream(message) = error;
        assert!(message.contains("500"));
        assert!(message.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_malformed_upstream_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/rest/v1/guestbook")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body("{\"not\":\"an array\"}")
            .create_async()
            .await;

        let storage = storage_for(&server);
        assert!(storage.find_all_entries().await.is_err());
    }
}
