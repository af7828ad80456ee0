pub mod payloads;
pub mod server;
