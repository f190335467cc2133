use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::entries::Entry;
use crate::storage::CreateEntryValues;
use crate::storage::Storage;
use crate::storage::UpdateEntryValues;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// An entry the way the browser sees it
///
/// Field names match the columns of the hosted table, the UI reads both
/// shapes interchangeably
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl EntryResponse {
    fn from_entry(entry: Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            message: entry.message,
            created_at: entry.created_at,
        }
    }

    fn from_entry_multiple(mut entries: Vec<Entry>) -> Vec<Self> {
        entries
            .drain(..)
            .map(Self::from_entry)
            .collect::<Vec<Self>>()
    }
}

pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<EntryResponse>>, Error> {
    let entries = storage
        .find_all_entries()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(EntryResponse::from_entry_multiple(entries)))
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryForm {
    name: String,
    message: String,
}

pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateEntryForm>,
) -> Result<Success<Vec<EntryResponse>>, Error> {
    let values = CreateEntryValues {
        name: &form.name,
        message: &form.message,
    };

    let entry = storage
        .create_entry(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(EntryResponse::from_entry_multiple(vec![
        entry,
    ])))
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryForm {
    name: Option<String>,
    message: Option<String>,
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(entry_id): PathParameters<Uuid>,
    Form(form): Form<UpdateEntryForm>,
) -> Result<Success<Vec<EntryResponse>>, Error> {
    let values = UpdateEntryValues {
        name: form.name.as_ref(),
        message: form.message.as_ref(),
    };

    let entry = storage
        .update_entry(&entry_id, &values)
        .await
        .map_err(Error::internal_server_error)?;

    // an unknown ID is an empty result, not an error
    Ok(Success::ok(EntryResponse::from_entry_multiple(
        entry.into_iter().collect(),
    )))
}

pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(entry_id): PathParameters<Uuid>,
) -> Result<Success<Vec<EntryResponse>>, Error> {
    let entry = storage
        .delete_entry(&entry_id)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(EntryResponse::from_entry_multiple(
        entry.into_iter().collect(),
    )))
}
