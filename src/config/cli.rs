use std::path::PathBuf;

use clap::{Args, ValueHint, builder::BoolishValueParser};

/// Configuration flags shared by every command of the admin binary.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "HAPPYART_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Base URL of the backend project.
    #[arg(
        long = "backend-url",
        env = "HAPPYART_BACKEND_URL",
        value_name = "URL",
        global = true
    )]
    pub backend_url: Option<String>,

    /// Public (anon) API key of the backend project.
    #[arg(
        long = "anon-key",
        env = "HAPPYART_ANON_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub anon_key: Option<String>,

    /// Override the object-store bucket receiving images.
    #[arg(long = "storage-bucket", value_name = "NAME", global = true)]
    pub storage_bucket: Option<String>,

    /// Override the maximum accepted image size in bytes.
    #[arg(long = "max-image-bytes", value_name = "BYTES", global = true)]
    pub max_image_bytes: Option<u64>,

    /// Override where the signed-in session is cached.
    #[arg(
        long = "session-file",
        env = "HAPPYART_SESSION_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub session_file: Option<PathBuf>,

    /// Override how long toasts stay visible, in milliseconds.
    #[arg(long = "toast-ttl-ms", value_name = "MILLIS", global = true)]
    pub toast_ttl_ms: Option<u64>,

    /// Identity provider to use (live|mock).
    #[arg(long = "auth-mode", env = "HAPPYART_AUTH_MODE", value_name = "MODE", global = true)]
    pub auth_mode: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
