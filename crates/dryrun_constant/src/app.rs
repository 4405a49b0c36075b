//! Application metadata constants

pub const NAME: &str = "dryrun";
pub const DISPLAY_NAME: &str = "Code Analyzer Pro";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "AI-narrated dry runs of source code against a test case";
pub const TAGLINE: &str = "Elevate your code with AI-powered analysis";

/// Directory name for dryrun data under the home directory or a project root
pub const DATA_DIR: &str = ".dryrun";
/// Env file inside DATA_DIR
pub const ENV_FILE: &str = "env";
