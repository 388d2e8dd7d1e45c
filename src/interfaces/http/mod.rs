mod page;

use crate::application::use_cases::dashboard::ChartsResponse;
use crate::application::{DashboardService, TableRequest};
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info, warn};

/// Entries kept in the in-memory log ring.
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub dashboard: Arc<DashboardService>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
pub struct ChartsQuery {
    pub country: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct FailuresQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: String,
}

/// Non-numeric bounds count as absent.
fn parse_year(value: Option<&String>) -> Option<i32> {
    value.and_then(|v| v.trim().parse::<i32>().ok())
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page::INDEX_HTML)
}

#[get("/options")]
async fn options(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.options())
}

#[get("/charts")]
async fn charts(data: web::Data<HttpState>, query: web::Query<ChartsQuery>) -> impl Responder {
    let response = data.dashboard.charts_by_country(
        query.country.as_deref(),
        parse_year(query.start.as_ref()),
        parse_year(query.end.as_ref()),
    );

    if let ChartsResponse::Error { incident_id, .. } = &response {
        add_log(
            &data.logs,
            "ERROR",
            "Charts",
            &format!("Chart aggregation failed (incident {})", incident_id),
        );
    }

    HttpResponse::Ok().json(response)
}

#[get("/failures")]
async fn failures(data: web::Data<HttpState>, query: web::Query<FailuresQuery>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.failure_chart(query.category.as_deref()))
}

#[get("/export")]
async fn export(data: web::Data<HttpState>, query: web::Query<ExportQuery>) -> impl Responder {
    match data.dashboard.export(&query.format) {
        Ok(Some(file)) => {
            add_log(
                &data.logs,
                "INFO",
                "Export",
                &format!("Exported {} ({} bytes)", file.file_name(), file.bytes.len()),
            );
            HttpResponse::Ok()
                .content_type(file.content_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.file_name()),
                ))
                .insert_header((header::ETAG, format!("\"{}\"", file.etag())))
                .body(file.bytes)
        }
        Ok(None) => {
            add_log(
                &data.logs,
                "WARN",
                "Export",
                &format!("Unknown export format '{}', nothing exported", query.format),
            );
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Export",
                &format!("Export failed: {}", e),
            );
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[post("/table")]
async fn table(data: web::Data<HttpState>, req: web::Json<TableRequest>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.table_page(&req))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(PoisonError::into_inner);
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

/// Record a diagnostic entry and emit the matching tracing event.
pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => error!(source, "{}", message),
        "WARN" => warn!(source, "{}", message),
        _ => info!(source, "{}", message),
    }
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(
        web::scope("/api")
            .service(options)
            .service(charts)
            .service(failures)
            .service(export)
            .service(table)
            .service(get_logs),
    );
}

pub fn start_server(
    dashboard: Arc<DashboardService>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { dashboard, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local dashboard, any origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
