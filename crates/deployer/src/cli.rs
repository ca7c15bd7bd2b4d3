use std::{fmt, path::PathBuf};

#[derive(Debug, clap::Parser)]
#[clap(name = "deploy", about = "Deploys compiled contracts and records their addresses")]
pub struct Args {
    /// Path to the deployment configuration file in TOML format.
    #[clap(long, env, default_value = "deploy.toml")]
    pub config: PathBuf,

    /// Network to deploy to. Defaults to the `default-network` of the
    /// configuration file.
    #[clap(long, env)]
    pub network: Option<String>,

    /// Only run deploy scripts with at least one of these tags. Runs all
    /// scripts if empty.
    #[clap(long, env, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Delete the existing deployment records of the network before running
    /// the scripts.
    #[clap(long, env)]
    pub reset: bool,

    /// The log filter.
    #[clap(long, env, default_value = "warn,deployer=debug,configs=debug")]
    pub log: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env)]
    pub stderr_threshold: Option<tracing::Level>,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            config,
            network,
            tags,
            reset,
            log,
            stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "config: {}", config.display())?;
        writeln!(f, "network: {network:?}")?;
        writeln!(f, "tags: {tags:?}")?;
        writeln!(f, "reset: {reset}")?;
        writeln!(f, "log: {log}")?;
        writeln!(f, "stderr_threshold: {stderr_threshold:?}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}
