//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_NAME};
use crate::error::{StockpotError, StockpotResult};
use crate::ui::{self, StepKind, UiContext};
use std::path::PathBuf;
use tokio::fs;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.history_log",
    "catalog.url",
    "catalog.cache_name",
    "catalog.cache_dir",
    "catalog.manifest_suffix",
    "project.source_dir",
    "project.markers",
    "package_manager.program",
    "package_manager.add_args",
];

/// Keys whose values are comma-separated lists
const LIST_KEYS: &[&str] = &["project.markers", "package_manager.add_args"];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> StockpotResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(manager, config, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> StockpotResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> StockpotResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_with(
            &ctx,
            StepKind::Warn,
            &format!("Config already exists at {}", path.display()),
            Some("Use --force to overwrite"),
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_with(
        &ctx,
        StepKind::Ok,
        "Configuration initialized",
        Some(&path.display().to_string()),
    );
    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> StockpotResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    match key.split('.').collect::<Vec<_>>().as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["general", "history_log"] => config.general.history_log = parse_bool(value)?,

        ["catalog", "url"] => config.catalog.url = value.to_string(),
        ["catalog", "cache_name"] => config.catalog.cache_name = value.to_string(),
        ["catalog", "cache_dir"] => config.catalog.cache_dir = Some(PathBuf::from(value)),
        ["catalog", "manifest_suffix"] => config.catalog.manifest_suffix = value.to_string(),

        ["project", "source_dir"] => config.project.source_dir = value.to_string(),
        ["project", "markers"] => config.project.markers = parse_list(value),

        ["package_manager", "program"] => config.package_manager.program = value.to_string(),
        ["package_manager", "add_args"] => config.package_manager.add_args = parse_list(value),

        _ => {
            ui::step_with(&ctx, StepKind::Fail, "Unknown config key", Some(key));
            ui::step(&ctx, StepKind::Remark, "Valid keys:");
            for key in VALID_KEYS {
                eprintln!("  {}", key);
            }
            return Ok(());
        }
    }

    manager.save(&config).await?;
    ui::step(&ctx, StepKind::Ok, &format!("Set {} = {}", key, value));
    Ok(())
}

async fn set_local_value(key: &str, value: &str) -> StockpotResult<()> {
    let ctx = UiContext::detect();

    if !VALID_KEYS.contains(&key) {
        return Err(StockpotError::User(format!("Unknown config key: {}", key)));
    }

    let cwd =
        std::env::current_dir().map_err(|e| StockpotError::io("getting current directory", e))?;
    let local_path = cwd.join(LOCAL_CONFIG_NAME);

    let mut doc: toml::Value = if local_path.exists() {
        let content = fs::read_to_string(&local_path)
            .await
            .map_err(|e| StockpotError::io(format!("reading {}", local_path.display()), e))?;
        content
            .parse()
            .map_err(|e: toml::de::Error| StockpotError::ConfigInvalid {
                path: local_path.clone(),
                reason: e.to_string(),
            })?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };

    set_toml_value(&mut doc, key, value)?;

    // Only the keys set here end up in the local file
    let content = toml::to_string_pretty(&doc)?;
    fs::write(&local_path, content)
        .await
        .map_err(|e| StockpotError::io(format!("writing {}", local_path.display()), e))?;

    ui::step(
        &ctx,
        StepKind::Ok,
        &format!("Set {} = {} in {}", key, value, local_path.display()),
    );
    Ok(())
}

/// Set a dot-separated key in a TOML value tree, creating intermediate tables as needed.
fn set_toml_value(doc: &mut toml::Value, key: &str, value: &str) -> StockpotResult<()> {
    let Some((parents, leaf)) = key.rsplit_once('.') else {
        return Err(StockpotError::User(format!("Expected section.key, got: {}", key)));
    };

    let mut current = doc;
    for part in parents.split('.') {
        current = current
            .as_table_mut()
            .ok_or_else(|| StockpotError::User(format!("Expected table at key: {}", part)))?
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| StockpotError::User(format!("Expected table for key: {}", key)))?;

    let toml_value = if LIST_KEYS.contains(&key) {
        toml::Value::Array(parse_list(value).into_iter().map(toml::Value::String).collect())
    } else if let Ok(flag) = value.parse::<bool>() {
        toml::Value::Boolean(flag)
    } else {
        toml::Value::String(value.to_string())
    };

    table.insert(leaf.to_string(), toml_value);
    Ok(())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> StockpotResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(StockpotError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_log_format(value: &str) -> StockpotResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(StockpotError::User(format!(
            "Invalid log format: {}. Use text or json",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_toml_value_creates_tables() {
        let mut doc = toml::Value::Table(toml::map::Map::new());
        set_toml_value(&mut doc, "package_manager.program", "npm").unwrap();
        set_toml_value(&mut doc, "package_manager.add_args", "install, --save").unwrap();
        set_toml_value(&mut doc, "general.history_log", "false").unwrap();

        assert_eq!(doc["package_manager"]["program"].as_str(), Some("npm"));
        let args = doc["package_manager"]["add_args"].as_array().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].as_str(), Some("--save"));
        assert_eq!(doc["general"]["history_log"].as_bool(), Some(false));

        let config: Config = doc.try_into().unwrap();
        assert_eq!(config.package_manager.add_args, vec!["install", "--save"]);
    }

    #[test]
    fn set_toml_value_needs_section() {
        let mut doc = toml::Value::Table(toml::map::Map::new());
        assert!(set_toml_value(&mut doc, "program", "npm").is_err());
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_list("a, ,b"), vec!["a", "b"]);
        assert!(parse_bool("yes").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert!(parse_log_format("json").is_ok());
        assert!(parse_log_format("xml").is_err());
    }
}
