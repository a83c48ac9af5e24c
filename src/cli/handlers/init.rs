use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::cli::output::Reply;
use crate::io::config_io;
use crate::model::config::DEFAULT_UTC_OFFSET;

const CONFIG_TEMPLATE: &str = r##"# quickdo configuration

# The todo.txt file tasks are captured into. A leading ~ is your home directory.
file_path = {file_path}

# "Today" is always computed at this fixed UTC offset (+HH:MM, -HH:MM or Z).
utc_offset = {utc_offset}

# --- Templates ---
# Apply with: qd add -t <index or name> "text"
# Or manage with: qd template add <name> --project p --context c
#
# [[templates]]
# name = "work"
# projects = ["work"]
# contexts = ["office"]
# priority = "B"
"##;

/// Render the starter config with TOML-quoted values filled in
pub fn render_config(file_path: &str) -> String {
    CONFIG_TEMPLATE
        .replace("{file_path}", &toml_edit::Value::from(file_path).to_string())
        .replace(
            "{utc_offset}",
            &toml_edit::Value::from(DEFAULT_UTC_OFFSET).to_string(),
        )
}

pub fn cmd_init(
    args: InitArgs,
    config_path: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config_io::write_new_config(config_path, &render_config(&args.file), args.force)?;
    if json {
        println!("{}", serde_json::to_string(&Reply::ok())?);
    } else {
        println!("wrote {}", config_path.display());
    }
    Ok(())
}
