use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use actix_multipart::form::bytes::Bytes as MultipartBytes;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::application::ConvertWorkbookUseCase;
use crate::domain::conversion::RawInput;
use crate::domain::error::ConvertError;
use crate::infrastructure::config::Settings;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct AppState {
    pub settings: Settings,
    pub convert_use_case: ConvertWorkbookUseCase,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry);
    if logs.len() > 100 {
        logs.remove(0);
    }
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "sheetpress is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "sheetpress",
    }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<AppState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

#[derive(Debug, MultipartForm)]
struct UploadForm {
    #[multipart(rename = "file")]
    file: MultipartBytes,
}

#[post("/convert")]
async fn convert(
    data: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let filename = form
        .file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());
    let size = form.file.data.len();

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("file uploaded: {} ({} bytes)", filename, size),
    );

    let limit = data.settings.max_upload_bytes;
    if size > limit {
        let err = ConvertError::InputTooLarge { size, limit };
        add_log(&data.logs, "WARN", "HttpApi", &err.to_string());
        return HttpResponse::PayloadTooLarge()
            .json(serde_json::json!({ "detail": err.to_string() }));
    }

    let input = RawInput {
        bytes: form.file.data.to_vec(),
        filename: filename.clone(),
    };
    let state = data.clone();
    let logs = data.logs.clone();
    let result = web::block(move || state.convert_use_case.convert(&input, &logs)).await;

    match result {
        Ok(Ok(outcome)) => {
            let download_name = derived_filename(&filename);
            HttpResponse::Ok()
                .content_type(
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                )
                .insert_header((
                    "Content-Disposition",
                    format!(
                        "attachment; filename*=UTF-8''{}",
                        urlencoding::encode(&download_name)
                    ),
                ))
                .insert_header(("X-Conversion-Method", outcome.strategy.clone()))
                .insert_header(("X-Original-Rows", outcome.rows.to_string()))
                .insert_header(("X-Original-Cols", outcome.cols.to_string()))
                .body(outcome.bytes)
        }
        Ok(Err(ConvertError::UnrecognizedFormat { attempts })) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "detail": "unsupported or corrupt file format",
                "attempts": attempts,
            }))
        }
        Ok(Err(err @ ConvertError::InputTooLarge { .. })) => HttpResponse::PayloadTooLarge()
            .json(serde_json::json!({ "detail": err.to_string() })),
        Ok(Err(ConvertError::Internal(msg))) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("conversion failed internally: {}", msg),
            );
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "detail": "internal conversion error" }))
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("conversion worker failed: {}", e),
            );
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "detail": "internal conversion error" }))
        }
    }
}

/// Download name for the converted document: original stem plus a fixed
/// suffix and the canonical extension. Non-ASCII survives because the
/// transport header carries it percent-encoded.
fn derived_filename(original: &str) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    let stem = if stem.trim().is_empty() { "converted" } else { stem };
    format!("{}_converted.xlsx", stem)
}

pub fn start_server(state: AppState) -> std::io::Result<Server> {
    let bind_addr = (state.settings.host.clone(), state.settings.port);
    // Head-room over the admission cap so the explicit size check is
    // the one that answers, not the multipart framing limit.
    let multipart_limit = state.settings.max_upload_bytes + 1024 * 1024;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(data.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(multipart_limit)
                    .memory_limit(multipart_limit),
            )
            .service(root)
            .service(health)
            .service(get_logs)
            .service(convert)
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body, TestRequest};

    fn test_state(max_upload_bytes: usize) -> web::Data<AppState> {
        let settings = Settings {
            max_upload_bytes,
            ..Settings::default()
        };
        web::Data::new(AppState {
            settings,
            convert_use_case: ConvertWorkbookUseCase::new(),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn multipart_body(filename: &str, content: &[u8]) -> (String, Vec<u8>) {
        let boundary = "sheetpress-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                boundary, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", boundary),
            body,
        )
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = init_service(App::new().service(health)).await;
        let resp = call_service(&app, TestRequest::get().uri("/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_convert_csv_upload() {
        let app = init_service(
            App::new().app_data(test_state(1024 * 1024)).service(convert),
        )
        .await;

        let (content_type, body) = multipart_body("people.csv", b"name,age\nalice,30\nbob,25\n");
        let req = TestRequest::post()
            .uri("/convert")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers().clone();
        assert_eq!(headers.get("X-Conversion-Method").unwrap(), "csv-utf-8");
        assert_eq!(headers.get("X-Original-Rows").unwrap(), "2");
        assert_eq!(headers.get("X-Original-Cols").unwrap(), "2");
        assert!(headers
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("people_converted.xlsx"));

        let body = read_body(resp).await;
        assert_eq!(&body[..4], &[0x50, 0x4B, 0x03, 0x04]);
    }

    #[actix_web::test]
    async fn test_convert_rejects_unrecognized_bytes() {
        let app = init_service(
            App::new().app_data(test_state(1024 * 1024)).service(convert),
        )
        .await;

        let (content_type, body) = multipart_body("noise.bin", &[0xF9, 0xFA, 0xFB, 0xF8]);
        let req = TestRequest::post()
            .uri("/convert")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_convert_rejects_oversized_upload() {
        let app = init_service(App::new().app_data(test_state(8)).service(convert)).await;

        let (content_type, body) = multipart_body("big.csv", b"name,age\nalice,30\n");
        let req = TestRequest::post()
            .uri("/convert")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_derived_filename() {
        assert_eq!(derived_filename("report.csv"), "report_converted.xlsx");
        assert_eq!(derived_filename("data"), "data_converted.xlsx");
        assert_eq!(derived_filename("성적표.xls"), "성적표_converted.xlsx");
        assert_eq!(derived_filename(".csv"), ".csv_converted.xlsx");
    }

    #[test]
    fn test_log_ring_is_capped() {
        let logs = Mutex::new(Vec::new());
        for i in 0..150 {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), 100);
        assert_eq!(logs[0].message, "entry 50");
    }
}
