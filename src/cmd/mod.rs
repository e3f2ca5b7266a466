mod check;
mod detect;

pub use check::cmd_check;
pub use detect::cmd_detect;

use std::path::Path;

use anyhow::Result;

use hlsplay::config::{self, Settings};

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => config::load_settings_from(path),
        None => config::load_settings(),
    }
}
