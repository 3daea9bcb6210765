pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod fallback;
pub mod message;
pub mod persona;
pub mod session;
pub mod transport;
