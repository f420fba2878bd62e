//! Command-line surface for `happyart-admin`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use happyart::config::ConfigArgs;
use happyart::domain::ContentId;
use happyart::domain::types::StatusFilter;
use happyart_api_types::{AGE_GROUPS, CATEGORIES, DIFFICULTIES};

#[derive(Parser, Debug)]
#[command(
    name = "happyart-admin",
    version,
    about = "Happy Art Town admin console",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign up and manage the cached session
    Auth(AuthArgs),
    /// Course catalogue management
    Courses(CoursesArgs),
    /// Article management
    Articles(ArticlesArgs),
    /// Site-wide settings
    Settings(SettingsArgs),
    /// Dashboard counts
    Stats,
    /// Connection status, busy flags and session state
    Status,
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

/// Password input. The flag is hidden from `--help` output to keep secrets
/// out of shell history; prefer the env var or a file.
#[derive(Args, Debug, Clone, Default)]
pub struct PasswordArgs {
    #[arg(long, env = "HAPPYART_PASSWORD", hide_env_values = true, hide = true)]
    pub password: Option<String>,
    /// Read the password from a file
    #[arg(long)]
    pub password_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Sign in and cache the session
    Login {
        #[arg(long)]
        email: String,
        #[command(flatten)]
        password: PasswordArgs,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[command(flatten)]
        password: PasswordArgs,
        /// Defaults to the password itself
        #[arg(long, env = "HAPPYART_CONFIRM_PASSWORD", hide_env_values = true, hide = true)]
        confirm_password: Option<String>,
    },
    /// Sign out and forget the cached session
    Logout,
    /// Send a password reset email
    ResetPassword {
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Update the signed-in user's profile
    Profile {
        #[arg(long)]
        full_name: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum StatusArg {
    #[default]
    All,
    Published,
    Draft,
}

impl From<StatusArg> for StatusFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => StatusFilter::All,
            StatusArg::Published => StatusFilter::Published,
            StatusArg::Draft => StatusFilter::Draft,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive title substring
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct IdArg {
    #[arg(long)]
    pub id: ContentId,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CourseFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = PossibleValuesParser::new(AGE_GROUPS.iter().copied()))]
    pub age_group: Option<String>,
    #[arg(long)]
    pub emoji: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub lessons: Option<i32>,
    #[arg(long, value_parser = PossibleValuesParser::new(DIFFICULTIES.iter().copied()))]
    pub difficulty: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ArticleFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Read the article body from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long, value_parser = PossibleValuesParser::new(CATEGORIES.iter().copied()))]
    pub category: Option<String>,
    #[arg(long)]
    pub emoji: Option<String>,
    #[arg(long)]
    pub read_time: Option<String>,
}

/// Image attached to a create or update.
#[derive(Args, Debug, Clone, Default)]
pub struct ImageArg {
    /// Upload this image and use it as the item's picture
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub action: CoursesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CoursesCmd {
    /// List courses, newest first
    List(ListArgs),
    /// Show one course
    Show(IdArg),
    /// Create an unpublished course
    Create {
        #[command(flatten)]
        fields: CourseFields,
        #[command(flatten)]
        image: ImageArg,
    },
    /// Edit a course; omitted fields keep their current value
    Update {
        #[command(flatten)]
        id: IdArg,
        #[command(flatten)]
        fields: CourseFields,
        #[command(flatten)]
        image: ImageArg,
    },
    /// Publish or unpublish
    Toggle(IdArg),
    /// Delete after confirmation
    Delete(IdArg),
}

#[derive(Parser, Debug)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub action: ArticlesCmd,
}

#[derive(Subcommand, Debug)]
pub enum ArticlesCmd {
    /// List articles, newest first
    List(ListArgs),
    /// Show one article
    Show(IdArg),
    /// Create an unpublished article
    Create {
        #[command(flatten)]
        fields: ArticleFields,
        #[command(flatten)]
        image: ImageArg,
    },
    /// Edit an article; omitted fields keep their current value
    Update {
        #[command(flatten)]
        id: IdArg,
        #[command(flatten)]
        fields: ArticleFields,
        #[command(flatten)]
        image: ImageArg,
    },
    /// Publish or unpublish
    Toggle(IdArg),
    /// Delete after confirmation
    Delete(IdArg),
}

#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    /// Show stored settings
    Get,
    /// Save the settings form; omitted fields keep their current value
    Save(SettingsSaveArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsSaveArgs {
    #[arg(long)]
    pub site_name: Option<String>,
    #[arg(long)]
    pub site_description: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub max_courses_per_user: Option<String>,
}
