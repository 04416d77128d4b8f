pub mod files;
pub mod friends;
pub mod messages;
pub mod users;
