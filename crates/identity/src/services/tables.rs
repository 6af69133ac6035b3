//! Fixed word tables for identity generation. All tables are non-empty,
//! so lookups never fail.

pub const FIRST_NAMES: &[&str] = &[
    "Ava", "Bruno", "Clara", "Diego", "Elena", "Felix", "Greta", "Hugo",
    "Iris", "Jonas", "Kira", "Leo", "Mara", "Nico", "Olive", "Piotr",
    "Quinn", "Rosa", "Sven", "Tessa",
];

pub const LAST_NAMES: &[&str] = &[
    "Abbott", "Becker", "Castillo", "Dvorak", "Eriksen", "Fontaine",
    "Garner", "Holm", "Ivanov", "Jensen", "Keller", "Lindgren", "Moreau",
    "Novak", "Okafor", "Petrov", "Quintana", "Rossi", "Santos", "Tanaka",
];

pub const FUN_WORDS: &[&str] = &[
    "ninja", "pixel", "turbo", "comet", "waffle", "gizmo", "rocket",
    "noodle", "panda", "mango", "cosmic", "doodle",
];

pub const JOBS: &[&str] = &[
    "graphic designer",
    "developer",
    "barista",
    "freelancer",
    "teacher",
    "student",
    "marketing intern",
];

pub const PASSIONS: &[&str] = &[
    "travel",
    "street food",
    "sci-fi",
    "bikepacking",
    "memes",
    "board games",
    "AI experiments",
    "photography",
];

pub const HOMETOWNS: &[&str] = &[
    "Berlin", "Austin", "Wellington", "Madrid", "Toronto", "Lisbon",
    "Chicago", "Skopje",
];

pub const STREETS: &[&str] = &[
    "Oak Street",
    "Maple Avenue",
    "Sunset Blvd",
    "Cedar Lane",
    "Broadway",
    "Main Street",
    "Hillcrest Drive",
    "Park Avenue",
    "River Road",
    "Highland Street",
];

pub const CITIES: &[&str] = &[
    "Madrid", "Wellington", "Austin", "Berlin", "Toronto", "Lisbon", "Oslo",
    "Chicago",
];

pub const COUNTRIES: &[&str] = &[
    "Spain", "New Zealand", "USA", "Germany", "Canada", "Portugal", "Norway",
];
