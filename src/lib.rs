pub mod config;
pub mod database;
pub mod logging;
pub mod models;
pub mod utils;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use database::Database;
pub use models::{Status, Task, TimeTag};
pub use utils::Profile;
