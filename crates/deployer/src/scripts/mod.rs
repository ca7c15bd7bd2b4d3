//! Deploy scripts, executed in order of their IDs.

mod token3;

use {crate::context::Context, anyhow::Context as _};

pub use token3::DeployToken3;

/// A single deployment step.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DeployScript: Send + Sync + 'static {
    /// Unique ID, scripts run in ascending order of it.
    fn id(&self) -> &'static str;

    /// Tags that select the script from the command line.
    fn tags(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &Context) -> anyhow::Result<()>;
}

/// All known deploy scripts, ordered by ID.
pub fn all() -> Vec<Box<dyn DeployScript>> {
    let mut scripts: Vec<Box<dyn DeployScript>> = vec![Box::new(DeployToken3)];
    scripts.sort_by_key(|script| script.id());
    scripts
}

/// Keeps the scripts that have at least one of the given tags. An empty tag
/// filter keeps all of them.
pub fn select(scripts: Vec<Box<dyn DeployScript>>, tags: &[String]) -> Vec<Box<dyn DeployScript>> {
    if tags.is_empty() {
        return scripts;
    }
    scripts
        .into_iter()
        .filter(|script| {
            script
                .tags()
                .iter()
                .any(|tag| tags.iter().any(|wanted| wanted == tag))
        })
        .collect()
}

/// Runs the scripts one after the other, stopping at the first failure.
pub async fn run_all(scripts: &[Box<dyn DeployScript>], ctx: &Context) -> anyhow::Result<()> {
    for script in scripts {
        tracing::info!(id = script.id(), "running deploy script");
        script
            .run(ctx)
            .await
            .with_context(|| format!("deploy script {} failed", script.id()))?;
    }
    Ok(())
}
