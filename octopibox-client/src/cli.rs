use std::path::PathBuf;

use clap::Parser;

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $OCTOPIBOX_CONFIG
  3) XDG default: ~/.config/octopibox/client.yaml
"#;

#[derive(Debug, Parser)]
#[command(
    name = "octopibox-client",
    version,
    about = "Desktop companion for the OctoPiBox printer power plugin",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Host base URL (e.g., http://octopi.local). Overrides the config file.
    #[arg(long)]
    pub server: Option<String>,
}
