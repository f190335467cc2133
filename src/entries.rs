use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// A single guestbook submission
///
/// `id` and `created_at` are assigned by the data layer and never change
#[derive(Clone, Debug)]
pub struct Entry {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
