use crate::models::person::{Address, Person};
use crate::services::random::{secure_password, RandomSource, PASSWORD_LENGTH};
use crate::services::tables;
use chrono::{Duration, NaiveDate, Utc};

/// Domain used for emails of generated persons. Synthetic only; a real
/// mailbox is created separately via the mail provider.
pub const SYNTHETIC_DOMAIN: &str = "example.com";

pub const DEFAULT_MIN_AGE: i64 = 18;
pub const DEFAULT_MAX_AGE: i64 = 60;

// Truncated year length; the age window is expressed in whole days.
const DAYS_IN_YEAR: i64 = 365;

/// Which external avatar service a profile picture URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoPurpose {
    LinkedIn,
    Facebook,
    Avatar,
    Other,
}

impl PhotoPurpose {
    fn tag(self) -> &'static str {
        match self {
            PhotoPurpose::LinkedIn => "LinkedIn",
            PhotoPurpose::Facebook => "Facebook",
            PhotoPurpose::Avatar => "Avatar",
            PhotoPurpose::Other => "other",
        }
    }
}

/// Builds a profile picture URL for the given username. `Avatar` routes to
/// a dedicated avatar service; every other purpose shares one provider and
/// differs only by the purpose prefix in the seed parameter.
pub fn profile_pic_url(username: &str, purpose: PhotoPurpose) -> String {
    if purpose == PhotoPurpose::Avatar {
        return format!(
            "https://api.dicebear.com/7.x/fun-emoji/png?seed={}&size=128",
            username
        );
    }
    format!("https://i.pravatar.cc/150?u={}-{}", purpose.tag(), username)
}

/// Picks a birthday uniformly over the `[min_age, max_age]` window,
/// counted back in whole days from today.
pub fn generate_birthday(src: &mut RandomSource, min_age: i64, max_age: i64) -> NaiveDate {
    let age_in_days = src.int_in(min_age * DAYS_IN_YEAR, max_age * DAYS_IN_YEAR);
    Utc::now().date_naive() - Duration::days(age_in_days)
}

/// One of four nickname shapes mixing a fun word, the lowercase first name
/// and a short random number.
pub fn generate_nickname(src: &mut RandomSource, first_name: &str) -> String {
    let base = first_name.to_lowercase();
    match src.int_in(0, 3) {
        0 => format!("{}_{}", base, src.pick(tables::FUN_WORDS)),
        1 => format!("{}{}", src.pick(tables::FUN_WORDS), src.int_in(10, 99)),
        2 => format!("{}_{}", src.pick(tables::FUN_WORDS), base),
        _ => format!("{}{}", base, src.int_in(100, 999)),
    }
}

/// Single-sentence backstory filling job/hometown/passion slots. The job
/// table can be overridden by the caller.
pub fn generate_backstory(
    src: &mut RandomSource,
    first_name: &str,
    job_titles: Option<&[&str]>,
) -> String {
    let jobs = job_titles.unwrap_or(tables::JOBS);
    format!(
        "{} is a {} from {} who loves {} and recently started experimenting with temp email identities.",
        first_name,
        src.pick(jobs),
        src.pick(tables::HOMETOWNS),
        src.pick(tables::PASSIONS),
    )
}

/// Street number + street name, city, 5-digit zip and country, each drawn
/// independently. City, zip and country are not correlated on purpose.
pub fn generate_address(src: &mut RandomSource) -> Address {
    let street_number = src.int_in(1, 299);
    let street = src.pick(tables::STREETS);
    Address {
        street: format!("{} {}", street_number, street),
        city: src.pick(tables::CITIES).to_string(),
        zip_code: src.int_in(10000, 99999).to_string(),
        country: src.pick(tables::COUNTRIES).to_string(),
    }
}

/// Generates a full person record from the given random source.
pub fn generate_person_with(src: &mut RandomSource) -> Person {
    let first_name = src.pick(tables::FIRST_NAMES).to_string();
    let last_name = src.pick(tables::LAST_NAMES).to_string();
    let birthday = generate_birthday(src, DEFAULT_MIN_AGE, DEFAULT_MAX_AGE);
    let username = format!(
        "{}.{}{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        src.int_in(10, 99)
    );
    let nickname = generate_nickname(src, &first_name);
    let backstory = generate_backstory(src, &first_name, None);
    let address = generate_address(src);

    Person {
        email: format!("{}@{}", username, SYNTHETIC_DOMAIN),
        linkedin_photo_url: profile_pic_url(&username, PhotoPurpose::LinkedIn),
        facebook_photo_url: profile_pic_url(&username, PhotoPurpose::Facebook),
        avatar_url: profile_pic_url(&username, PhotoPurpose::Avatar),
        username,
        first_name,
        last_name,
        birthday,
        nickname,
        backstory,
        address,
        password: secure_password(PASSWORD_LENGTH),
    }
}

/// Generates a person from a fresh entropy-seeded source. Each call is
/// independent; nothing is shared between generations.
pub fn generate_person() -> Person {
    generate_person_with(&mut RandomSource::new())
}
