//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! defaults and `MCP_*` environment variables (optionally via a `.env` file).

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,

    /// Where the file resolver looks for inputs.
    pub resolver: ResolverConfig,

    /// Scratch workspace placement.
    pub workspace: WorkspaceConfig,

    /// External conversion programs.
    pub collaborators: CollaboratorsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory. Resolved input files must lie inside it.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether resolved inputs may be symlinks.
    pub allow_symlinks: bool,
}

/// Search locations and limits for the file resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Directory relative paths are resolved against.
    /// `None` uses the process working directory at request time.
    pub current_dir: Option<PathBuf>,

    /// System temporary directory.
    pub temp_dir: PathBuf,

    /// Shared upload/staging directories, searched after the temp directory.
    pub common_upload_dirs: Vec<PathBuf>,

    /// Agent-specific upload directories, searched last.
    pub agent_upload_dirs: Vec<PathBuf>,

    /// Maximum depth of the recursive search pass.
    pub max_depth: usize,
}

/// Scratch workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Parent directory under which per-request workspaces are created.
    pub parent_dir: PathBuf,
}

/// Paths of the external conversion programs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    /// LibreOffice executable.
    pub soffice_path: String,

    /// wkhtmltopdf executable.
    pub wkhtmltopdf_path: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let mut common_upload_dirs = vec![
            PathBuf::from("/tmp"),
            PathBuf::from("./uploads"),
            PathBuf::from("/var/tmp"),
            PathBuf::from("/var/upload"),
        ];
        if let Some(home) = dirs::home_dir() {
            common_upload_dirs.push(home.join("tmp"));
        }
        if let Some(downloads) = dirs::download_dir().or_else(|| dirs::home_dir().map(|h| h.join("Downloads"))) {
            common_upload_dirs.push(downloads);
        }

        Self {
            current_dir: None,
            temp_dir: env::temp_dir(),
            common_upload_dirs,
            agent_upload_dirs: vec![
                PathBuf::from("./claude_uploads"),
                PathBuf::from("./uploads"),
                PathBuf::from("./input"),
                PathBuf::from("./claude_files"),
                PathBuf::from("/tmp/claude"),
            ],
            max_depth: 6,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            parent_dir: env::temp_dir(),
        }
    }
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            soffice_path: "soffice".to_string(),
            wkhtmltopdf_path: "wkhtmltopdf".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "file-converter".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            resolver: ResolverConfig::default(),
            workspace: WorkspaceConfig::default(),
            collaborators: CollaboratorsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_SEARCH_DIRS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        // Security
        if let Ok(root_path) = env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Path security enabled: root directory set to {:?}", config.security.root_path);
        } else {
            warn!(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 Any file the resolver finds may be converted."
            );
        }

        if let Ok(allow_symlinks) = env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        // Resolver
        if let Some(extra) = env::var_os("MCP_SEARCH_DIRS") {
            let extra: Vec<PathBuf> = env::split_paths(&extra)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            info!("Additional search directories: {:?}", extra);
            config.resolver.agent_upload_dirs.extend(extra);
        }

        if let Ok(depth) = env::var("MCP_SEARCH_MAX_DEPTH") {
            match depth.parse() {
                Ok(depth) => config.resolver.max_depth = depth,
                Err(_) => warn!("Ignoring invalid MCP_SEARCH_MAX_DEPTH '{}'", depth),
            }
        }

        // Workspace
        if let Ok(dir) = env::var("MCP_WORKSPACE_DIR") {
            config.workspace.parent_dir = PathBuf::from(dir);
        }

        // Collaborators
        if let Ok(path) = env::var("MCP_SOFFICE_PATH") {
            config.collaborators.soffice_path = path;
        }

        if let Ok(path) = env::var("MCP_WKHTMLTOPDF_PATH") {
            config.collaborators.wkhtmltopdf_path = path;
        }

        config
    }
}
