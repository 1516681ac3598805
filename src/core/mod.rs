pub mod backend;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod message;
