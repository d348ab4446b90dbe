use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediCost";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default upload body limit: 10 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Number of treatment codes kept from a prescription.
pub const DEFAULT_TOP_N: usize = 3;

/// Get the application data directory (~/MediCost/).
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default location of the seeded hospital database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("medicost.db")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medicost_lib=info,medicost=info,tower_http=info"
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Tesseract `tessdata` directory. `None` uses the system default.
    pub tessdata_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Directory for staged uploads. `None` uses the system temp dir.
    pub staging_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            db_path: default_db_path(),
            tessdata_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            staging_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `MEDICOST_*` environment variables.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let ip = lookup("MEDICOST_BIND")
            .and_then(|v| v.parse::<IpAddr>().ok())
            .unwrap_or(defaults.bind_addr.ip());
        let port = lookup("MEDICOST_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.bind_addr.port());

        Self {
            bind_addr: SocketAddr::new(ip, port),
            db_path: lookup("MEDICOST_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            tessdata_dir: lookup("MEDICOST_TESSDATA").map(PathBuf::from),
            max_upload_bytes: lookup("MEDICOST_MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.max_upload_bytes),
            staging_dir: lookup("MEDICOST_STAGING_DIR").map(PathBuf::from),
        }
    }
}
