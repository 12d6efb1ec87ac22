use clap::Parser;
use std::path::PathBuf;

/// The API to talk to when neither `--api-url` nor `ACCOUNTS_API_URL` is set
/// at runtime: whatever `ACCOUNTS_API_URL` was at build time, or a local
/// development server.
const DEFAULT_API_URL: &str = match option_env!("ACCOUNTS_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/",
};

/// Create, update and log into your account from the terminal
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// Base URL of the account API. Endpoints like `user/login/` are
    /// resolved relative to it.
    #[clap(long, env = "ACCOUNTS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where should we store the session and logs?
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Which log lines to write, in `RUST_LOG` syntax.
    #[clap(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("dev", "accounts", "accounts")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The file the session (and so the auth token) lives in.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }
}
