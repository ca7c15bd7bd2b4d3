use {
    super::DeployScript,
    crate::{context::Context, registry::Deployment},
};

const CONTRACT: &str = "Token3";

/// Deploys the `Token3` contract from the `deployer` account and records it
/// under its contract name.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeployToken3;

#[async_trait::async_trait]
impl DeployScript for DeployToken3 {
    fn id(&self) -> &'static str {
        "03-deploy-token3"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["all", "token3"]
    }

    async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let deployer = ctx.named_accounts().get("deployer")?;
        let chain_id = ctx.network().chain_id;

        let factory = ctx.contract_factory(CONTRACT).await?;
        let contract = factory.deploy(deployer, &[]).await?;
        tracing::info!(address = %contract.address, chain_id, "Token3 address");

        let artifact = ctx.artifact(CONTRACT).await?;
        ctx.save(
            CONTRACT,
            Deployment::new(contract.address, artifact).with_transaction(&contract),
        )
        .await?;
        Ok(())
    }
}
