use clap::Parser;
use rowscope_core::PagingConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "rowscope-studio")]
#[command(about = "rowscope - browse large SQLite tables page by page")]
#[command(version)]
pub struct Args {
    /// SQLite database to browse (default: in-memory demo database)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Seed the movie demo tables into the database
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Address to bind to (localhost only for security)
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Session timeout in minutes
    #[arg(long, default_value_t = 60)]
    pub session_timeout: u64,

    /// Maximum concurrent sessions
    #[arg(long, default_value_t = 10)]
    pub max_sessions: usize,

    /// Rows per page before the first row count is known
    #[arg(long, default_value_t = rowscope_core::config::DEFAULT_INITIAL_CHUNK_SIZE)]
    pub initial_chunk_size: u32,

    /// Fixed rows per page (disables adaptive sizing)
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Per-query timeout in seconds (0 disables)
    #[arg(long, default_value_t = 30)]
    pub query_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<PathBuf>,
    pub demo: bool,
    pub session_timeout: Duration,
    pub max_sessions: usize,
    pub paging: PagingConfig,
}

impl From<Args> for StudioConfig {
    fn from(args: Args) -> Self {
        let mut paging = PagingConfig::new().with_initial_chunk_size(args.initial_chunk_size);
        if let Some(size) = args.chunk_size {
            paging = paging.with_fixed_chunk_size(size);
        }
        paging = match args.query_timeout {
            0 => paging.without_query_timeout(),
            secs => paging.with_query_timeout(Duration::from_secs(secs)),
        };

        Self {
            host: args.host,
            port: args.port,
            // no file means there is nothing to browse but the demo
            demo: args.demo || args.database.is_none(),
            database: args.database,
            session_timeout: Duration::from_secs(args.session_timeout * 60),
            max_sessions: args.max_sessions,
            paging,
        }
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database: None,
            demo: true,
            session_timeout: Duration::from_secs(60 * 60),
            max_sessions: 10,
            paging: PagingConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Human-readable database location.
    pub fn database_label(&self) -> String {
        match &self.database {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}
