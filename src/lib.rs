//! Parley is a terminal client for a chat backend that answers on behalf of
//! a selected user identity and model.
//!
//! The crate is organized in a few layers:
//! - [`core`] owns the conversation state, the send protocol, the backend
//!   contract and its HTTP implementation, and configuration.
//! - [`ui`] turns messages into something to show: the markdown engine with
//!   its HTML and terminal renderers, themes, and transcript formatting.
//! - [`api`] defines the JSON payloads exchanged with the backend.
//! - [`cli`] is the command line and the interactive chat loop.
//!
//! The binary (`src/main.rs`) only calls [`cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
