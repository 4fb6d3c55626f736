pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crate::DirectoryClient;
use std::sync::Arc;

/// Entry point: take over the terminal and run the interactive search
pub fn run(client: Arc<dyn DirectoryClient>, initial_query: Option<&str>) -> crate::Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(client, initial_query);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
