//! All things related to the storage of guestbook entries
//!
//! The entries live in a remote `guestbook` table; ordering, uniqueness and
//! persistence are guarantees of that service, not of this code

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entries::Entry;

pub use memory::Memory;
pub use supabase::Supabase;

pub mod memory;
pub mod supabase;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The call to the data layer failed
    ///
    /// Not-found, validation and connectivity problems all end up here, the
    /// caller only learns that the upstream did not deliver
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// The configured storage backend
pub enum Backend {
    /// Entries live in a hosted `guestbook` table
    Supabase(Supabase),

    /// Entries live in process memory, gone on restart
    Memory(Memory),
}

/// Setup the storage
///
/// Uses the hosted table when `SUPABASE_URL` is set, process memory otherwise
///
/// # Errors
///
/// Will return `Err` when `SUPABASE_URL` is set without a usable
/// `SUPABASE_KEY`
pub fn setup() -> anyhow::Result<Backend> {
    let base_url = std::env::var("SUPABASE_URL").unwrap_or_default();

    if base_url.is_empty() {
        tracing::warn!("`SUPABASE_URL` is not set, entries are stored in process memory only");

        return Ok(Backend::Memory(Memory::new()));
    }

    let api_key = std::env::var("SUPABASE_KEY").unwrap_or_default();

    if api_key.is_empty() {
        anyhow::bail!("`SUPABASE_KEY` must be set when `SUPABASE_URL` is set");
    }

    Ok(Backend::Supabase(Supabase::new(&base_url, &api_key)?))
}

/// Values to create an Entry
pub struct CreateEntryValues<'a> {
    /// Name of the visitor signing the guestbook
    pub name: &'a str,

    /// The message they leave behind
    ///
    /// Can be anything
    pub message: &'a str,
}

/// Values to update an Entry
///
/// Fields left as `None` keep their current value
pub struct UpdateEntryValues<'a> {
    /// New (optional) name on the entry
    pub name: Option<&'a String>,

    /// New (optional) message on the entry
    pub message: Option<&'a String>,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all entries
    ///
    /// Ordered by creation time, newest first
    async fn find_all_entries(&self) -> Result<Vec<Entry>>;

    /// Create a single entry
    ///
    /// The data layer assigns `id` and `created_at`
    async fn create_entry(&self, values: &CreateEntryValues<'_>) -> Result<Entry>;

    /// Update a single entry, only the supplied fields
    ///
    /// Returns `None` when no entry matches the ID; missing and deleted
    /// entries are indistinguishable
    async fn update_entry(
        &self,
        id: &Uuid,
        values: &UpdateEntryValues<'_>,
    ) -> Result<Option<Entry>>;

    /// Delete a single entry, returning its last snapshot
    ///
    /// Returns `None` when no entry matches the ID
    async fn delete_entry(&self, id: &Uuid) -> Result<Option<Entry>>;
}
