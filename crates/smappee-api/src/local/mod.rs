// Local gateway API
//
// Session-based access to a Smappee monitor on the LAN. Every call except
// `logon` requires a logged-in session.

pub mod client;
mod command_control;
mod config;
pub mod instantaneous;
mod logs;
mod system;

pub use client::{DEFAULT_PASSWORD, LocalClient, Session};
pub use instantaneous::InstantaneousValue;
