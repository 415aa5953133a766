mod commands;
mod db;
mod domain;
mod error;
mod export;
mod import;
mod models;
mod server;
mod statement;
mod store;

use std::path::PathBuf;

use db::SqliteStorage;
use store::Store;

pub struct AppState {
  pub store: Store,
  pub app_dir: PathBuf,
}

fn main() {
  let app_dir = db::resolve_app_dir().expect("Failed to resolve app data directory");
  let storage = SqliteStorage::open(&app_dir).expect("Failed to open state storage");
  let store = Store::open(Box::new(storage)).expect("Failed to load state");
  let state = AppState { store, app_dir };

  let port = server::resolve_port();
  let url = format!("http://127.0.0.1:{port}");
  eprintln!("CasiFuel running at {url}");
  eprintln!("LAN access: http://{}:{port}", server::local_ip_string());
  let _ = open::that(&url);

  if let Err(err) = server::run_server(&state, port) {
    eprintln!("Server failed to start: {err}");
    std::process::exit(1);
  }
}
