pub mod friend;
pub mod friend_request_status;
pub mod msg;
pub mod user;

pub use friend::*;
pub use friend_request_status::*;
pub use msg::*;
pub use user::*;
