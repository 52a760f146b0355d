pub mod api;
pub mod channel_ban;
pub(crate) mod messages;
pub mod softban;

#[cfg(test)]
pub(crate) mod testing;

pub use channel_ban::{loreban, mentorban, wikiban};
pub use softban::softban;
