//! CLI entry point for dryrun.

mod cli;
mod commands;
mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use dryrun_constant::app;

use crate::cli::Cli;

/// How far up from the working directory to look for project config.
const MAX_PARENT_DEPTH: usize = 32;

/// Nearest `relative` file in `start` or one of its parents.
fn find_upwards(start: &Path, relative: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    for _ in 0..MAX_PARENT_DEPTH {
        let candidate = dir.join(relative);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Load env files. Earlier files win; dotenvy never overrides a set variable.
/// Order: 1) real environment  2) .dryrun/env (project)  3) .env (project)  4) ~/.dryrun/env
fn load_dryrun_config() {
    let project_env = Path::new(app::DATA_DIR).join(app::ENV_FILE);
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_upwards(&cwd, &project_env) {
            let _ = dotenvy::from_path(&path);
        }
        if let Some(path) = find_upwards(&cwd, Path::new(".env")) {
            let _ = dotenvy::from_path(&path);
        }
    }
    if let Some(home) = dirs::home_dir() {
        let global = home.join(&project_env);
        if global.exists() {
            let _ = dotenvy::from_path(&global);
        }
    }
}

#[tokio::main]
async fn main() {
    load_dryrun_config();
    let cli = Cli::parse();
    output::init(cli.output);

    let outcome = commands::handle(cli).await;
    dryrun_observability::shutdown();
    if let Err(e) = outcome {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
