use clap::Parser;
use fieldreport::run_server;

#[derive(Parser)]
#[command(name = "fieldreport")]
#[command(about = "Issue-report and media upload service")]
struct Cli {
    /// Port to listen on; the PORT environment variable overrides the
    /// default.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let port = match cli.port {
        Some(port) => port,
        None => std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000),
    };

    run_server(port).await
}
