use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use log::error;

use crate::{
    binder::{CalendarOptions, ViewBinder},
    error::{Error, Result},
    event::{records_to_events, EventDescriptor, MissingFieldPolicy},
    ics::events_to_ics,
    record::load_records,
};

pub const PAGE_PATH: &str = "/";
pub const EVENTS_PATH: &str = "/events";
pub const ICS_PATH: &str = "/calendar.ics";

const ICS_NAME: &str = env!("CARGO_PKG_NAME");

/// Everything a request needs. Records are re-read on every request so the
/// calendar always reflects the current data.
#[derive(Debug)]
pub struct AppState {
    pub records: PathBuf,
    pub template: String,
    pub container: String,
    pub options: CalendarOptions,
    pub policy: MissingFieldPolicy,
}

impl AppState {
    fn load_events(&self) -> Result<Vec<EventDescriptor>> {
        let records = load_records(&self.records)?;
        records_to_events(&records, self.policy)
    }

    fn render_page(&self) -> Result<String> {
        let events = self.load_events()?;

        let mut binder =
            ViewBinder::initialize(self.template.as_str(), &self.container, self.options.clone())?;
        binder.set_events(events);
        let page = binder.render()?;
        binder.destroy();

        Ok(page)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(PAGE_PATH, get(handle_page))
        .route(EVENTS_PATH, get(handle_events))
        .route(ICS_PATH, get(handle_ics))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found\n") })
        .with_state(state)
}

fn error_response(err: Error) -> Response {
    error!("Failed to serve calendar: {err}");

    let status = match err {
        Error::MalformedRecord { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, format!("Calendar unavailable: {err}\n")).into_response()
}

async fn handle_page(State(state): State<Arc<AppState>>) -> Response {
    match state.render_page() {
        Ok(page) => Html(page).into_response(),
        Err(err) => error_response(err),
    }
}

async fn handle_events(State(state): State<Arc<AppState>>) -> Response {
    match state.load_events() {
        Ok(events) => Json(events).into_response(),
        Err(err) => error_response(err),
    }
}

async fn handle_ics(State(state): State<Arc<AppState>>) -> Response {
    let events = match state.load_events() {
        Ok(events) => events,
        Err(err) => return error_response(err),
    };

    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    (
        [("content-type", "text/calendar")],
        events_to_ics(ICS_NAME, &events, &dtstamp).to_string(),
    )
        .into_response()
}
