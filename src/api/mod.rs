//! All API endpoint setup

use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;

pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod entries;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let guestbook = Router::new()
        .route("/", get(entries::list::<S>))
        .route("/", post(entries::create::<S>))
        .route("/{entry}", put(entries::update::<S>))
        .route("/{entry}", delete(entries::delete::<S>));

    Router::new().nest("/guestbook", guestbook)
}
