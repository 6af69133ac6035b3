use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A synthetic identity. Generated on demand, never persisted, and the
/// email is not a deliverable mailbox until the caller upgrades it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub nickname: String,
    pub backstory: String,
    pub address: Address,
    pub linkedin_photo_url: String,
    pub facebook_photo_url: String,
    pub avatar_url: String,
    pub password: String,
}

/// Mailing address for a generated person. Street, city, zip and country
/// are drawn independently; no geographic consistency is promised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}
