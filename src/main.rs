#![allow(non_snake_case)]

use swimBot::cli;
use swimBot::config::{AppConfig, Settings};
use swimBot::runtime;

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    let config = AppConfig::load();
    let settings = match Settings::from_config(&config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let run_mode = config.prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        runtime::run_api(settings).await;
    } else if run_mode == "cli" {
        cli::cli(settings).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
