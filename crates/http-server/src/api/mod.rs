pub mod identity;
pub mod mailbox;
