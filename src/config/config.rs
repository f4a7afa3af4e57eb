use std::collections::HashMap;
use serde::{Serialize, Deserialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub http: Http,
    #[serde(default)]
    pub paths: HashMap<String, String>,
    /// Path of a redirect document (`- path: ..., url: ...` records).
    pub redirects: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Http {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    pub port: u16,
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}
