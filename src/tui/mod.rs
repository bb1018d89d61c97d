pub mod app;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod widgets;

pub use app::{App, Mode};
pub use error::TuiError;
pub use events::{handle_key_event, run_event_loop};
pub use layout::Layout;
pub use render::render;

use crate::config::Theme;
use crate::database::Database;

/// Load the first list and run the interactive session until the user quits
pub fn run(database: Database, theme: Theme) -> Result<(), TuiError> {
    let app = App::new(database, theme)?;
    run_event_loop(app)
}
