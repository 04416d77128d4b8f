pub mod friend_handlers;
