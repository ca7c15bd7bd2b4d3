use {
    crate::{
        artifacts::Artifact,
        chain::{self, DeployedContract, Deployer},
    },
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        primitives::{Address, Bytes},
    },
    std::sync::Arc,
    thiserror::Error,
};

/// Deploys instances of a single compiled contract.
#[derive(Clone)]
pub struct ContractFactory {
    artifact: Artifact,
    deployer: Arc<dyn Deployer>,
}

impl ContractFactory {
    pub fn new(artifact: Artifact, deployer: Arc<dyn Deployer>) -> Self {
        Self { artifact, deployer }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// The init code of a creation transaction: the contract bytecode
    /// followed by the ABI encoded constructor arguments.
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes, Error> {
        if self.artifact.bytecode.is_empty() {
            return Err(Error::Abstract(self.artifact.fully_qualified_name()));
        }
        let libraries = self.artifact.unlinked_libraries();
        if !libraries.is_empty() {
            return Err(Error::Unlinked {
                contract: self.artifact.fully_qualified_name(),
                libraries,
            });
        }

        let encoded_args = match &self.artifact.abi.constructor {
            Some(constructor) => constructor.abi_encode_input(args)?,
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(Error::UnexpectedArguments {
                    contract: self.artifact.fully_qualified_name(),
                    count: args.len(),
                });
            }
        };

        let mut code = self.artifact.bytecode.to_vec();
        code.extend(encoded_args);
        Ok(code.into())
    }

    /// Deploys a new instance and waits for the creation to be confirmed.
    pub async fn deploy(
        &self,
        from: Address,
        args: &[DynSolValue],
    ) -> Result<DeployedContract, Error> {
        let code = self.creation_code(args)?;
        tracing::debug!(
            contract = %self.artifact.fully_qualified_name(),
            %from,
            size = code.len(),
            "deploying contract"
        );
        Ok(self.deployer.deploy(from, code).await?)
    }
}

impl std::fmt::Debug for ContractFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ContractFactory")
            .field("contract", &self.artifact.fully_qualified_name())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} has no bytecode, it is abstract or an interface")]
    Abstract(String),
    #[error("{contract} needs libraries linked before deployment: {libraries:?}")]
    Unlinked {
        contract: String,
        libraries: Vec<String>,
    },
    #[error("{contract} has no constructor but {count} arguments were given")]
    UnexpectedArguments { contract: String, count: usize },
    #[error("invalid constructor arguments: {0}")]
    Encoding(#[from] alloy::dyn_abi::Error),
    #[error(transparent)]
    Chain(#[from] chain::Error),
}
