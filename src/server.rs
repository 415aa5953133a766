use std::io::Cursor;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::commands;
use crate::error::AppError;
use crate::AppState;

const UI_PORT_FALLBACK: u16 = 48350;

const INDEX_HTML: &str = include_str!("../ui/index.html");

type HttpResponse = Response<Cursor<Vec<u8>>>;

pub fn resolve_port() -> u16 {
  std::env::var("CASIFUEL_PORT")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(UI_PORT_FALLBACK)
}

pub fn local_ip_string() -> String {
  local_ip_address::local_ip()
    .map(|ip| ip.to_string())
    .unwrap_or_else(|_| "0.0.0.0".to_string())
}

pub fn run_server(state: &AppState, port: u16) -> Result<(), AppError> {
  let server =
    Server::http(("0.0.0.0", port)).map_err(|err| AppError::new("SERVER", err.to_string()))?;
  for request in server.incoming_requests() {
    handle_request(request, state);
  }
  Ok(())
}

fn handle_request(mut request: Request, state: &AppState) {
  let method = request.method().clone();
  let url = request.url().split('?').next().unwrap_or("").to_string();
  let response = route(&mut request, state, &method, &url);
  let _ = request.respond(response);
}

fn route(request: &mut Request, state: &AppState, method: &Method, url: &str) -> HttpResponse {
  match (method, url) {
    (Method::Get, "/") | (Method::Get, "/index.html") => page_response(),
    (Method::Get, "/api/state") => respond_with(commands::get_state(state)),
    (Method::Post, "/api/vendor") => match read_json(request) {
      Ok(input) => respond_with(commands::update_vendor(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/client") => match read_json(request) {
      Ok(input) => respond_with(commands::update_client(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/meta") => match read_json(request) {
      Ok(input) => respond_with(commands::update_meta(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/transactions/add") => respond_with(commands::add_transaction(state)),
    (Method::Post, "/api/transactions/update") => match read_json(request) {
      Ok(input) => respond_with(commands::update_transaction(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/transactions/delete") => match read_json(request) {
      Ok(input) => respond_with(commands::delete_transaction(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/bulk/rate") => match read_json(request) {
      Ok(input) => respond_with(commands::apply_bulk_rate(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/bulk/billno") => match read_json(request) {
      Ok(input) => respond_with(commands::apply_smart_bill_fill(state, input)),
      Err(response) => response,
    },
    (Method::Post, "/api/import") => handle_import(request, state),
    (Method::Post, "/api/statement/pdf") => respond_with(commands::generate_statement_pdf(state)),
    (Method::Post, "/api/statement/excel") => {
      respond_with(commands::generate_statement_excel(state))
    }
    (Method::Post, "/api/reset") => respond_with(commands::reset_all(state)),
    _ => json_error(StatusCode(404), "NOT_FOUND", "Route not found"),
  }
}

fn handle_import(request: &mut Request, state: &AppState) -> HttpResponse {
  let file_name = request
    .headers()
    .iter()
    .find(|header| header.field.equiv("X-File-Name"))
    .map(|header| header.value.as_str().to_string())
    .unwrap_or_else(|| "import.xlsx".to_string());

  let mut body = Vec::new();
  if request.as_reader().read_to_end(&mut body).is_err() {
    return json_error(StatusCode(400), "IMPORT_PARSE", "Uploaded file could not be read");
  }

  respond_with(commands::import_transactions(state, &file_name, &body))
}

fn read_json<T: DeserializeOwned>(request: &mut Request) -> Result<T, HttpResponse> {
  let mut body = Vec::new();
  if request.as_reader().read_to_end(&mut body).is_err() {
    return Err(json_error(
      StatusCode(400),
      "BAD_REQUEST",
      "Request body could not be read",
    ));
  }
  serde_json::from_slice(&body).map_err(|err| {
    json_error(
      StatusCode(400),
      "BAD_REQUEST",
      format!("Request body is invalid: {err}"),
    )
  })
}

fn respond_with<T: Serialize>(result: Result<T, AppError>) -> HttpResponse {
  match result {
    Ok(value) => json_response(StatusCode(200), &value),
    Err(err) => json_error(StatusCode(400), &err.code, &err.message),
  }
}

fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> HttpResponse {
  let body = serde_json::to_vec(payload).unwrap_or_else(|_| b"{}".to_vec());
  let mut response = Response::from_data(body).with_status_code(status);
  response.add_header(http_header("Content-Type", "application/json"));
  response
}

fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> HttpResponse {
  json_response(status, &AppError::new(code, message))
}

fn page_response() -> HttpResponse {
  let mut response = Response::from_data(INDEX_HTML.as_bytes().to_vec());
  response.add_header(http_header("Content-Type", "text/html; charset=utf-8"));
  response
}

fn http_header(field: &str, value: &str) -> Header {
  Header::from_bytes(field.as_bytes(), value.as_bytes()).expect("static header is valid")
}
