pub mod record;
pub mod user;

pub use record::{lookup_text, update};
pub use user::{Address, Company, Geo, User, UserId, blank_draft};
