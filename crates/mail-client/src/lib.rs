pub mod client;
pub mod error;
pub mod models;

pub use client::{MailClient, DEFAULT_BASE_URL};
pub use error::MailClientError;
