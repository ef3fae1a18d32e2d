use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use log::info;

mod routes;
mod store;

use store::MemoryStore;

/// In-memory task store serving the task list REST surface.
#[derive(Debug, Parser)]
#[command(name = "tasklist-server", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TASKLIST_BIND", default_value = "127.0.0.1:3000")]
    bind: String,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let store = web::Data::new(MemoryStore::default());
    info!("task store listening on {}", args.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(&args.bind)
    .with_context(|| format!("failed to bind {}", args.bind))?
    .run()
    .await
    .context("task store stopped unexpectedly")
}
