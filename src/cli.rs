use chrono::Utc;
use clap::Parser;

use crate::clients::timetable_client::TimetableClient;
use crate::config::Settings;
use crate::service::render;
use crate::service::swim_service::SwimService;

/// Look up upcoming swimming sessions at a One Leisure centre.
#[derive(Parser)]
struct Cli {
    /// When to look, e.g. "today", "tomorrow", "next friday"
    #[arg(default_value = "today")]
    when: String,

    /// Activity keyword, e.g. "lane"
    #[arg(long, default_value = "")]
    filter: String,

    /// Name of the center
    #[arg(long)]
    center: Option<String>,
}

pub async fn cli(settings: Settings) {
    // Fine to panic here
    let cli = Cli::parse();
    let center = cli.center.unwrap_or_else(|| settings.center.clone());

    let client = TimetableClient::new(settings.api_url.clone());
    match SwimService::upcoming(
        &client,
        &center,
        &cli.when,
        &cli.filter,
        Utc::now(),
        settings.timezone,
    )
    .await
    {
        Ok((window, sessions)) => {
            println!("{}", render::render_table(window.start, &sessions, settings.timezone));
        }
        Err(err) => {
            eprintln!("Failed to fetch swimming times: {}", err);
            std::process::exit(1);
        }
    }
}
