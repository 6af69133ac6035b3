// POST endpoint /create

use axum::Json;
use identity::{generate_person, Person};
use serde::Serialize;

/// A generated person plus the (not yet issued) mailbox token slot. The
/// token stays null until the caller upgrades via /upgrade-email.
#[derive(Serialize)]
pub struct CreatePersonResponse {
    #[serde(flatten)]
    pub person: Person,
    pub token: Option<String>,
}

/// Handles the request to generate a new synthetic identity. Pure local
/// generation; no outbound call is made.
#[axum::debug_handler]
pub async fn create_person_handler() -> Json<CreatePersonResponse> {
    let person = generate_person();
    Json(CreatePersonResponse {
        person,
        token: None,
    })
}
