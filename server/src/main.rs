use clap::Parser;
use mindcare_server::{app, AppState};
use notify::{MailClient, NoopGateway, NotificationGateway};
use std::net::SocketAddr;
use std::sync::Arc;
use store::MemStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Address to bind the HTTP server
    #[arg(long, env = "MINDCARE_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let gateway: Arc<dyn NotificationGateway> = match MailClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("mail gateway not configured ({e}); guardian alerts will only be logged");
            Arc::new(NoopGateway)
        }
    };
    let state = AppState::new(Arc::new(MemStore::new()), gateway);
    let app = app(state);

    let addr: SocketAddr = cli.addr.parse()?;
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
