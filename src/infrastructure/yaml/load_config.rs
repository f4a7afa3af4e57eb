use std::{env, fs, path::{Path, PathBuf}, sync::{Arc, LazyLock}};
use regex::Regex;

use crate::config::Config;
use crate::handlers::{map_handler, Handler, NotFound};
use super::load_handlers::{yaml_handler, ParseError};

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][0-9a-zA-Z_]*)(:-([^}]+))?\}").expect("env var pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot find environment variable: {0}")]
    MissingVariable(String),
    #[error("invalid YAML or cannot be converted to Config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("errors found in configuration file: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Redirects(#[from] ParseError),
}

/// Replaces `${NAME}` and `${NAME:-default}` with values from `lookup`.
fn expand_vars_with<F>(raw_config: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(raw_config.len());
    let mut last_match = 0;
    for caps in ENV_VAR.captures_iter(raw_config) {
        let Some(m) = caps.get(0) else { continue };
        expanded.push_str(&raw_config[last_match..m.start()]);

        let env_name = &caps[1];
        match (lookup(env_name), caps.get(3)) {
            (Some(value), _) => expanded.push_str(&value),
            (None, Some(default)) => expanded.push_str(default.as_str()),
            (None, None) => return Err(ConfigError::MissingVariable(env_name.to_string())),
        }
        last_match = m.end();
    }
    expanded.push_str(&raw_config[last_match..]);
    Ok(expanded)
}

fn expand_vars(raw_config: &str) -> Result<String, ConfigError> {
    expand_vars_with(raw_config, |name| env::var(name).ok())
}

fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    if config.http.hostname.trim().is_empty() {
        errors.push("Invalid http configuration: hostname must not be empty".to_string());
    }
    if config.http.port == 0 {
        errors.push("Invalid http configuration: port must be greater than 0".to_string());
    }
    let mut bad_paths: Vec<&String> = config.paths.keys().filter(|path| !path.starts_with('/')).collect();
    bad_paths.sort();
    for path in bad_paths {
        errors.push(format!("Invalid path {:?}: paths must start with '/'", path));
    }
    errors
}

pub fn parse_config(raw_config: &str) -> Result<Config, ConfigError> {
    let expanded = expand_vars(raw_config)?;
    let config: Config = serde_yaml::from_str(&expanded)?;
    let errors = validate(&config);
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }
    Ok(config)
}

pub fn load_config(file_path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(file_path).map_err(|source| ConfigError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    parse_config(&data)
}

/// Builds the handler chain for `config`: the redirect document (if any)
/// in front of the inline `paths`, in front of [`NotFound`].
pub fn register_handlers(config: &Config) -> Result<Arc<dyn Handler>, ConfigError> {
    let inline = map_handler(config.paths.clone(), NotFound);
    let Some(redirects) = &config.redirects else {
        return Ok(Arc::new(inline));
    };

    let path = Path::new(redirects);
    let document = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let handler = yaml_handler(&document, inline)?;
    log::info!("loaded {} redirects from {}", handler.paths().len(), path.display());
    Ok(Arc::new(handler))
}
