use {
    alloy::{
        network::{EthereumWallet, TransactionBuilder},
        primitives::{Address, B256, Bytes},
        providers::{DynProvider, PendingTransactionError, Provider, ProviderBuilder},
        rpc::{client::RpcClient, types::TransactionRequest},
        signers::local::{LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
        transports::TransportError,
    },
    configs::Accounts,
    std::fmt,
    thiserror::Error,
};

/// A contract creation that made it on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    pub address: Address,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub from: Address,
}

/// Sends contract creation transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync + 'static {
    /// Sends a transaction creating a contract from `code` and waits until
    /// it is confirmed.
    async fn deploy(&self, from: Address, code: Bytes) -> Result<DeployedContract, Error>;
}

/// The Ethereum blockchain, accessed through a node's RPC API.
#[derive(Clone)]
pub struct Ethereum {
    provider: DynProvider,
    chain_id: u64,
    accounts: Vec<Address>,
    confirmations: u64,
}

impl Ethereum {
    /// Connects to the node of the given network. Transactions are signed
    /// locally if the network configures private keys or a mnemonic and by
    /// the node otherwise.
    pub async fn connect(network: &configs::Network, confirmations: u64) -> Result<Self, Error> {
        let signers = signers(&network.accounts)?;
        let client =
            RpcClient::new_http(network.url.clone()).with_poll_interval(network.polling_interval);
        let provider = match signers.split_first() {
            Some((primary, additional)) => {
                let mut wallet = EthereumWallet::new(primary.clone());
                for signer in additional {
                    wallet.register_signer(signer.clone());
                }
                ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_client(client)
                    .erased()
            }
            None => ProviderBuilder::new().connect_client(client).erased(),
        };

        let chain_id = provider.get_chain_id().await?;
        if let Some(configured) = network.chain_id {
            if configured != chain_id {
                return Err(Error::ChainIdMismatch {
                    configured,
                    actual: chain_id,
                });
            }
        }

        let accounts = if signers.is_empty() {
            provider.get_accounts().await?
        } else {
            signers.iter().map(|signer| signer.address()).collect()
        };
        tracing::info!(
            url = %network.url,
            chain_id,
            accounts = accounts.len(),
            "connected to node"
        );

        Ok(Self {
            provider,
            chain_id,
            accounts,
            confirmations: confirmations.max(1),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Accounts available for signing, in configuration order.
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl fmt::Debug for Ethereum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ethereum")
            .field("chain_id", &self.chain_id)
            .field("accounts", &self.accounts)
            .field("confirmations", &self.confirmations)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Deployer for Ethereum {
    async fn deploy(&self, from: Address, code: Bytes) -> Result<DeployedContract, Error> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(code);
        let pending = self.provider.send_transaction(tx).await?;
        let hash = *pending.tx_hash();
        tracing::debug!(?hash, %from, confirmations = self.confirmations, "sent contract creation");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(Error::Reverted(hash));
        }
        let address = receipt
            .contract_address
            .ok_or(Error::MissingContractAddress(hash))?;

        Ok(DeployedContract {
            address,
            transaction_hash: hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            from: receipt.from,
        })
    }
}

fn signers(accounts: &Accounts) -> Result<Vec<PrivateKeySigner>, Error> {
    match accounts {
        Accounts::Remote(_) => Ok(Vec::new()),
        Accounts::PrivateKeys(keys) => keys
            .iter()
            .map(|key| {
                PrivateKeySigner::from_bytes(&key.0).map_err(|err| Error::Signer(err.into()))
            })
            .collect(),
        Accounts::Mnemonic(mnemonic) => {
            let end = mnemonic
                .initial_index
                .checked_add(mnemonic.count)
                .ok_or(Error::MnemonicRange {
                    initial_index: mnemonic.initial_index,
                    count: mnemonic.count,
                })?;
            (mnemonic.initial_index..end)
                .map(|index| {
                    MnemonicBuilder::<English>::default()
                        .phrase(mnemonic.mnemonic.as_str())
                        .index(index)?
                        .build()
                })
                .collect::<Result<_, _>>()
                .map_err(Error::Signer)
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("RPC error: {0}")]
    Rpc(#[from] TransportError),
    #[error("error waiting for transaction: {0}")]
    Pending(#[from] PendingTransactionError),
    // Not carrying the key material, only the signer error.
    #[error("invalid signer configuration: {0}")]
    Signer(#[source] LocalSignerError),
    #[error("mnemonic account range starting at {initial_index} with {count} accounts overflows")]
    MnemonicRange { initial_index: u32, count: u32 },
    #[error("configured chain ID {configured} does not match the node's chain ID {actual}")]
    ChainIdMismatch { configured: u64, actual: u64 },
    #[error("contract creation {0} reverted")]
    Reverted(B256),
    #[error("receipt of contract creation {0} has no contract address")]
    MissingContractAddress(B256),
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{address, b256},
        configs::{Mnemonic, PrivateKey},
    };

    const NODE_HOST: &str = "http://127.0.0.1:8545";
    const ANVIL_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn signers_from_private_keys() {
        let accounts = Accounts::PrivateKeys(vec![PrivateKey(b256!(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        ))]);

        let signers = signers(&accounts).unwrap();

        assert_eq!(
            signers
                .iter()
                .map(|signer| signer.address())
                .collect::<Vec<_>>(),
            vec![address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
        );
    }

    #[test]
    fn signers_from_mnemonic() {
        let accounts = Accounts::Mnemonic(Mnemonic {
            mnemonic: ANVIL_MNEMONIC.to_string(),
            initial_index: 1,
            count: 2,
        });

        let addresses = signers(&accounts)
            .unwrap()
            .iter()
            .map(|signer| signer.address())
            .collect::<Vec<_>>();

        assert_eq!(
            addresses,
            vec![
                address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
                address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
            ]
        );
    }

    #[test]
    fn invalid_private_key() {
        let accounts = Accounts::PrivateKeys(vec![PrivateKey(B256::ZERO)]);

        assert!(matches!(signers(&accounts), Err(Error::Signer(_))));
    }

    #[test]
    fn mnemonic_range_overflow() {
        let accounts = Accounts::Mnemonic(Mnemonic {
            mnemonic: ANVIL_MNEMONIC.to_string(),
            initial_index: u32::MAX,
            count: 2,
        });

        assert!(matches!(
            signers(&accounts),
            Err(Error::MnemonicRange {
                initial_index: u32::MAX,
                count: 2
            })
        ));
    }

    #[test]
    fn remote_accounts_have_no_local_signers() {
        assert!(signers(&Accounts::default()).unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn local_node_deploy() {
        let network = configs::Network {
            url: NODE_HOST.parse().unwrap(),
            ..Default::default()
        };
        let eth = Ethereum::connect(&network, 1).await.unwrap();
        let from = eth.accounts()[0];

        // Returns a single STOP opcode as runtime code.
        let code = Bytes::from_static(&[
            0x60, 0x01, 0x60, 0x0c, 0x60, 0x00, 0x39, 0x60, 0x01, 0x60, 0x00, 0xf3, 0x00,
        ]);
        let deployed = eth.deploy(from, code).await.unwrap();

        assert_eq!(deployed.from, from);
        let runtime = eth.provider().get_code_at(deployed.address).await.unwrap();
        assert_eq!(&runtime[..], &[0x00]);
    }

    #[tokio::test]
    #[ignore]
    async fn local_node_chain_id_mismatch() {
        let network = configs::Network {
            url: NODE_HOST.parse().unwrap(),
            chain_id: Some(1),
            ..Default::default()
        };

        assert!(matches!(
            Ethereum::connect(&network, 1).await,
            Err(Error::ChainIdMismatch { configured: 1, .. })
        ));
    }
}
