mod friend;
mod message;
mod user;

pub use friend::*;
pub use message::*;
pub use user::*;
