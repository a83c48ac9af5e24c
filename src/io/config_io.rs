use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use directories::BaseDirs;

use crate::io::todo_io::atomic_write;
use crate::model::config::{Config, Template};
use crate::util::clock::parse_utc_offset;

/// Error type for reading and editing config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not parse config: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("invalid utc_offset {0:?}: expected +HH:MM, -HH:MM or Z")]
    InvalidOffset(String),
    #[error("could not determine the home directory")]
    NoHomeDirectory,
    #[error("a template named {0:?} already exists")]
    DuplicateTemplate(String),
    #[error("no template named {0:?}")]
    UnknownTemplate(String),
    #[error("templates must be written as [[templates]] tables to be edited")]
    InlineTemplates,
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// `<config dir>/quickdo/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(dirs.config_dir().join("quickdo").join("config.toml"))
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The fixed offset every "today" is computed in
pub fn utc_offset(config: &Config) -> Result<FixedOffset, ConfigError> {
    parse_utc_offset(&config.utc_offset)
        .ok_or_else(|| ConfigError::InvalidOffset(config.utc_offset.clone()))
}

/// Write a new config file, refusing to clobber an existing one unless `force`
pub fn write_new_config(path: &Path, content: &str, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    atomic_write(path, content.as_bytes()).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Append a template to the config document
pub fn add_template_to_config(
    doc: &mut toml_edit::DocumentMut,
    template: &Template,
) -> Result<(), ConfigError> {
    if !doc.get("templates").is_some_and(|item| item.is_array_of_tables()) {
        // `templates = []` is the only inline form we rewrite
        let replaceable = doc
            .get("templates")
            .is_none_or(|item| item.as_array().is_some_and(|a| a.is_empty()));
        if !replaceable {
            return Err(ConfigError::InlineTemplates);
        }
        doc["templates"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }
    let Some(templates) = doc["templates"].as_array_of_tables_mut() else {
        return Err(ConfigError::InlineTemplates);
    };
    if templates
        .iter()
        .any(|t| t.get("name").and_then(|v| v.as_str()) == Some(template.name.as_str()))
    {
        return Err(ConfigError::DuplicateTemplate(template.name.clone()));
    }

    let mut table = toml_edit::Table::new();
    table["name"] = toml_edit::value(&template.name);
    table["projects"] = toml_edit::value(string_array(&template.projects));
    table["contexts"] = toml_edit::value(string_array(&template.contexts));
    if let Some(priority) = template.priority {
        table["priority"] = toml_edit::value(priority.to_string());
    }
    templates.push(table);
    Ok(())
}

/// Remove a template by name from the config document
pub fn remove_template_from_config(
    doc: &mut toml_edit::DocumentMut,
    name: &str,
) -> Result<(), ConfigError> {
    let templates = doc
        .get_mut("templates")
        .and_then(|item| item.as_array_of_tables_mut())
        .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))?;
    let index = templates
        .iter()
        .position(|t| t.get("name").and_then(|v| v.as_str()) == Some(name))
        .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))?;
    templates.remove(index);
    Ok(())
}

fn string_array(items: &[String]) -> toml_edit::Array {
    items.iter().map(|s| s.as_str()).collect()
}
