use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use tera::Tera;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::clients::timetable_client::TimetableApi;
use crate::config::Settings;
use crate::service::render;
use crate::service::swim_service::SwimService;

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    pub settings: Settings,
    pub templates: Tera,
    pub api: Arc<dyn TimetableApi>,
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let index = warp::get()
        .and(warp::path::end())
        .and(with_state(state.clone()))
        .and_then(handle_index);

    let swim = warp::post()
        .and(warp::path("swim"))
        .and(warp::path::end())
        .and(with_state(state.clone()))
        .and(warp::body::form::<HashMap<String, String>>())
        .and_then(handle_swim);

    let assets = warp::get()
        .and(warp::path("assets"))
        .and(warp::fs::dir(state.settings.assets_dir.clone()));

    index.or(swim).or(assets)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_index(state: Arc<AppState>) -> Result<impl Reply, Infallible> {
    println!("req");
    match render::render_index_page(&state.templates) {
        Ok(body) => Ok(warp::reply::with_status(
            warp::reply::html(body),
            StatusCode::OK,
        )),
        Err(err) => {
            eprintln!("Failed to render index page: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::html("Failed to render page".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_swim(
    state: Arc<AppState>,
    form: HashMap<String, String>,
) -> Result<impl Reply, Infallible> {
    let phrase = form.get("query").map(String::as_str).unwrap_or("");
    let filter = form.get("filter").map(String::as_str).unwrap_or("");
    println!("swim req: query='{}' filter='{}'", phrase, filter);

    let result = SwimService::upcoming(
        state.api.as_ref(),
        &state.settings.center,
        phrase,
        filter,
        Utc::now(),
        state.settings.timezone,
    )
    .await;

    let (window, sessions) = match result {
        Ok(found) => found,
        Err(err) => {
            eprintln!("swim req failed: {}", err);
            // Bad input is the caller's problem; anything else is ours. The
            // server itself keeps running either way.
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            return Ok(warp::reply::with_status(
                warp::reply::html(format!("{}", err)),
                status,
            ));
        }
    };

    match render::render_results_page(
        &state.templates,
        window.start,
        &sessions,
        state.settings.timezone,
    ) {
        Ok(body) => Ok(warp::reply::with_status(
            warp::reply::html(body),
            StatusCode::OK,
        )),
        Err(err) => {
            eprintln!("Failed to render results page: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::html("Failed to render page".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
