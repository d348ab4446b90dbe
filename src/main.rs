use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use medicost_lib::config::ServerConfig;

#[derive(Parser)]
#[command(name = "medicost")]
#[command(about = "MediCost: prescription upload and hospital price comparison")]
#[command(version)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to bind the HTTP server to
    #[arg(short, long)]
    port: Option<u16>,

    /// Path of the hospital database (created and seeded if missing)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Tesseract tessdata directory
    #[arg(long)]
    tessdata: Option<PathBuf>,

    /// Maximum upload body size in bytes
    #[arg(long)]
    max_upload_bytes: Option<usize>,
}

impl Cli {
    /// Command-line flags win over `MEDICOST_*` environment variables.
    fn apply(self, config: ServerConfig) -> ServerConfig {
        let ip = self.bind.unwrap_or(config.bind_addr.ip());
        let port = self.port.unwrap_or(config.bind_addr.port());
        ServerConfig {
            bind_addr: SocketAddr::new(ip, port),
            db_path: self.db.unwrap_or(config.db_path),
            tessdata_dir: self.tessdata.or(config.tessdata_dir),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(config.max_upload_bytes),
            staging_dir: config.staging_dir,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().apply(ServerConfig::from_env());

    match medicost_lib::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("medicost: {e}");
            ExitCode::FAILURE
        }
    }
}
