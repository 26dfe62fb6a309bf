//! `sheetwright config`: inspect the effective configuration.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ConfigCommands;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub source: String,
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let body = serde_yaml::to_string(&self.config).unwrap_or_default();
        format!("# effective configuration ({})\n{body}", self.source)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(command: ConfigCommands, json_mode: bool) -> Result<()> {
    match command {
        ConfigCommands::Show { file } => {
            let (config, source) = match file {
                Some(path) => (
                    ConfigLoader::load_from_file(&path)?,
                    path.display().to_string(),
                ),
                None => (ConfigLoader::load()?, "defaults, .sheetwright/, SHEETWRIGHT_*".to_string()),
            };
            output(&ConfigOutput { source, config }, json_mode);
        }
    }
    Ok(())
}
