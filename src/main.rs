use std::{env, path::PathBuf, process::exit};
use url_redirector::infrastructure::yaml::load_config::{load_config, register_handlers};
use url_redirector::server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let config_path = PathBuf::from(env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yaml".into()));

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            exit(1);
        }
    };
    let handler = match register_handlers(&config) {
        Ok(handler) => handler,
        Err(err) => {
            log::error!("{}", err);
            exit(1);
        }
    };

    server::run(&config.http, handler).await
}
