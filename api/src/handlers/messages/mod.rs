pub mod msg_handlers;
pub mod ws;
