//! Deploys compiled contracts to an EVM network and keeps a record of every
//! deployment.

pub mod accounts;
pub mod artifacts;
pub mod chain;
pub mod cli;
pub mod context;
pub mod factory;
pub mod registry;
pub mod scripts;

use {
    crate::{
        accounts::NamedAccounts,
        artifacts::Artifacts,
        chain::{Deployer, Ethereum},
        context::{Context, Network},
        registry::{Directory, Registry},
    },
    alloy::primitives::Address,
    anyhow::Context as _,
    clap::Parser,
    std::{process::ExitCode, sync::Arc},
};

/// Entry point of the `deploy` binary.
pub async fn start(args: impl IntoIterator<Item = String>) -> ExitCode {
    let args = cli::Args::parse_from(args);
    let format = if args.use_json_logs {
        observe::Format::Json
    } else {
        observe::Format::Text
    };
    observe::tracing::initialize(
        &observe::Config::new(&args.log)
            .with_stderr_threshold(args.stderr_threshold)
            .with_format(format),
    );
    tracing::info!("running deployer with arguments:\n{}", args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(?err, "deployment failed");
            ExitCode::FAILURE
        }
    }
}

pub async fn run(args: cli::Args) -> anyhow::Result<()> {
    let config = configs::load(&args.config).await?;
    let name = args
        .network
        .clone()
        .unwrap_or_else(|| config.default_network.clone());
    let network = match config.network(&name) {
        Some(network) => network.clone(),
        None if configs::DEVELOPMENT_NETWORKS.contains(&name.as_str()) => {
            configs::Network::default()
        }
        None => anyhow::bail!("network {name:?} is not configured"),
    };
    if let Some(solidity) = &config.solidity {
        tracing::debug!(compilers = ?solidity.versions(), "expecting artifacts of compilers");
    }

    let eth = Ethereum::connect(&network, config.confirmations())
        .await
        .with_context(|| format!("failed to connect to network {name:?}"))?;
    let accounts = eth.accounts().to_vec();
    let target = Network {
        live: network.is_live(&name),
        chain_id: eth.chain_id(),
        name,
    };
    deploy(&args, &config, target, &accounts, Arc::new(eth)).await
}

/// Runs the selected deploy scripts against an already connected network.
async fn deploy(
    args: &cli::Args,
    config: &configs::Config,
    network: Network,
    accounts: &[Address],
    deployer: Arc<dyn Deployer>,
) -> anyhow::Result<()> {
    let accounts = NamedAccounts::resolve(
        &config.named_accounts,
        &network.name,
        network.chain_id,
        accounts,
    );
    for (role, address) in accounts.iter() {
        tracing::debug!(role, %address, "named account");
    }

    let registry = Directory::new(&config.paths.deployments, &network.name, network.chain_id);
    if args.reset {
        registry.reset().await?;
    }
    registry.open().await?;
    let registry = Arc::new(registry);

    let name = network.name.clone();
    let ctx = Context::new(
        network,
        accounts,
        Artifacts::new(&config.paths.artifacts),
        deployer,
        registry.clone(),
        config.deploy_parameters.clone(),
    )
    .with_verification(config.verify_contract);

    let scripts = scripts::select(scripts::all(), &args.tags);
    if scripts.is_empty() {
        tracing::warn!(tags = ?args.tags, "no deploy scripts match the given tags");
        return Ok(());
    }
    scripts::run_all(&scripts, &ctx).await?;

    for (contract, deployment) in registry.all().await? {
        tracing::info!(
            contract,
            address = %deployment.address,
            deployments = deployment.num_deployments,
            "deployed"
        );
    }
    if ctx.should_verify() && !ctx.is_development() {
        tracing::warn!(
            network = %name,
            "source verification requested, submit the sources to a block explorer"
        );
    }
    Ok(())
}
