#![warn(clippy::all)]

use handle_errors::Error;
use tracing_subscriber::fmt::format::FmtSpan;

mod config;
mod routes;
mod store;
mod types;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = config::Config::new()?;

    // RUST_LOG가 있으면 설정 파일의 로그 수준보다 우선한다.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter());

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        // 각 범위가 닫힐 때 이벤트를 기록한다.
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = store::Store::new(&config.database_url()).await?;

    sqlx::migrate!()
        .run(&store.connection)
        .await
        .map_err(Error::MigrationError)?;

    let routes = routes::polls(store);

    tracing::info!("Polls service listening on port {}", config.port);
    warp::serve(routes).run(([127, 0, 0, 1], config.port)).await;

    Ok(())
}
