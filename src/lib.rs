pub mod config;
pub mod error;
pub mod fetch;
pub mod resolve;
pub mod server;
pub mod stickers;
pub mod table;

pub use config::Config;
pub use error::ResolveError;
pub use table::{Record, Table};
