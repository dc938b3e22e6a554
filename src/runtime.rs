use std::net::SocketAddr;
use std::sync::Arc;

use crate::clients::timetable_client::TimetableClient;
use crate::config::Settings;
use crate::handlers::web::{self, AppState};
use crate::service::render;

pub async fn run_api(settings: Settings) {
    let templates = match render::load_templates(&settings.template_dir) {
        Ok(templates) => templates,
        Err(err) => {
            eprintln!(
                "Failed to load templates from {}: {}",
                settings.template_dir, err
            );
            return;
        }
    };

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            eprintln!("Invalid listen address {}: {}", settings.listen_addr, err);
            return;
        }
    };

    let api = Arc::new(TimetableClient::new(settings.api_url.clone()));
    let state = Arc::new(AppState {
        settings,
        templates,
        api,
    });

    println!("Starting server on {}", addr);
    warp::serve(web::routes(state)).run(addr).await;
}
