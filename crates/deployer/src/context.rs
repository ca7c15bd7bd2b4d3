//! Everything a deploy script gets to work with.

use {
    crate::{
        accounts::NamedAccounts,
        artifacts::{self, Artifact, Artifacts},
        chain::Deployer,
        factory::ContractFactory,
        registry::{self, Deployment, Registry},
    },
    configs::DeployParameters,
    std::sync::Arc,
};

/// The network scripts are deployed to, as reported by the connected node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Network {
    pub name: String,
    pub chain_id: u64,
    pub live: bool,
}

pub struct Context {
    network: Network,
    accounts: NamedAccounts,
    artifacts: Artifacts,
    deployer: Arc<dyn Deployer>,
    registry: Arc<dyn Registry>,
    parameters: DeployParameters,
    verify: bool,
}

impl Context {
    pub fn new(
        network: Network,
        accounts: NamedAccounts,
        artifacts: Artifacts,
        deployer: Arc<dyn Deployer>,
        registry: Arc<dyn Registry>,
        parameters: DeployParameters,
    ) -> Self {
        Self {
            network,
            accounts,
            artifacts,
            deployer,
            registry,
            parameters,
            verify: false,
        }
    }

    /// Marks deployed contracts for source verification.
    pub fn with_verification(self, verify: bool) -> Self {
        Self { verify, ..self }
    }

    pub fn named_accounts(&self) -> &NamedAccounts {
        &self.accounts
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub async fn contract_factory(&self, name: &str) -> Result<ContractFactory, artifacts::Error> {
        let artifact = self.artifacts.get(name).await?;
        Ok(ContractFactory::new(artifact, self.deployer.clone()))
    }

    pub async fn artifact(&self, name: &str) -> Result<Artifact, artifacts::Error> {
        self.artifacts.get(name).await
    }

    /// Records a deployment, replacing an earlier one with the same name.
    pub async fn save(&self, name: &str, deployment: Deployment) -> Result<(), registry::Error> {
        self.registry.save(name, &deployment).await?;
        tracing::info!(
            name,
            address = %deployment.address,
            network = %self.network.name,
            "saved deployment"
        );
        if self.verify {
            tracing::debug!(name, "contract marked for source verification");
        }
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<Option<Deployment>, registry::Error> {
        self.registry.get(name).await
    }

    pub fn deploy_parameters(&self) -> &DeployParameters {
        &self.parameters
    }

    pub fn should_verify(&self) -> bool {
        self.verify
    }

    /// Whether the active network is a local development chain.
    pub fn is_development(&self) -> bool {
        !self.network.live
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("network", &self.network)
            .field("accounts", &self.accounts)
            .field("artifacts", &self.artifacts.root())
            .field("verify", &self.verify)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        crate::{chain::MockDeployer, registry::MockRegistry},
        alloy::primitives::Address,
        mockall::predicate::eq,
        std::path::Path,
    };

    pub fn parameters() -> DeployParameters {
        DeployParameters {
            bid_time_tolerance: 300,
            auction_duration: 86_400,
            initial_bid: "0.01".to_string(),
            perc_increment: 5,
            executor_min_delay: 3600,
            executor_proposers: Vec::new(),
            executors: Vec::new(),
            quorum_percentage: 4,
            voting_period: 45_818,
            voting_delay: 1,
            veto_until: 1_700_000_000,
        }
    }

    /// A context for the local development network with the given
    /// collaborators.
    pub fn context(
        artifacts: &Path,
        accounts: NamedAccounts,
        deployer: MockDeployer,
        registry: MockRegistry,
    ) -> Context {
        Context::new(
            Network {
                name: "localhost".to_string(),
                chain_id: 31337,
                live: false,
            },
            accounts,
            Artifacts::new(artifacts),
            Arc::new(deployer),
            Arc::new(registry),
            parameters(),
        )
    }

    #[tokio::test]
    async fn exposes_network_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        artifacts::tests::write(dir.path(), &artifacts::tests::token3());
        let accounts = NamedAccounts::from_iter([("deployer".to_string(), Address::ZERO)]);

        let ctx = context(
            dir.path(),
            accounts,
            MockDeployer::new(),
            MockRegistry::new(),
        );

        assert_eq!(ctx.network().chain_id, 31337);
        assert!(ctx.is_development());
        assert!(!ctx.should_verify());
        assert_eq!(ctx.named_accounts().get("deployer").unwrap(), Address::ZERO);
        assert_eq!(ctx.deploy_parameters().auction_duration, 86_400);
        assert_eq!(
            ctx.contract_factory("Token3").await.unwrap().artifact(),
            &ctx.artifact("Token3").await.unwrap()
        );
        assert!(matches!(
            ctx.contract_factory("Token4").await,
            Err(artifacts::Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn saves_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        artifacts::tests::write(dir.path(), &artifacts::tests::token3());
        let artifact: Artifact = serde_json::from_value(artifacts::tests::token3()).unwrap();
        let deployment = Deployment::new(Address::repeat_byte(0xab), artifact);

        let mut registry = MockRegistry::new();
        registry
            .expect_save()
            .with(eq("Token3"), eq(deployment.clone()))
            .times(1)
            .returning(|_, _| Ok(()));
        registry
            .expect_get()
            .with(eq("Token3"))
            .returning({
                let deployment = deployment.clone();
                move |_| Ok(Some(deployment.clone()))
            });

        let ctx = context(
            dir.path(),
            NamedAccounts::default(),
            MockDeployer::new(),
            registry,
        )
        .with_verification(true);

        ctx.save("Token3", deployment.clone()).await.unwrap();
        assert_eq!(ctx.get("Token3").await.unwrap(), Some(deployment));
        assert!(ctx.should_verify());
    }
}
