pub mod models;
pub mod services;

pub use models::person::{Address, Person};
pub use services::generator::{generate_person, generate_person_with, PhotoPurpose, SYNTHETIC_DOMAIN};
pub use services::random::{secure_password, RandomSource, PASSWORD_LENGTH};
