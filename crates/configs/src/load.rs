use {
    crate::Config,
    std::path::{Path, PathBuf},
    thiserror::Error,
    tokio::fs,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    // Not carrying the detailed error because it could leak private keys.
    #[error("TOML syntax error while reading {path:?}")]
    Syntax { path: PathBuf },
    #[error("default network {0:?} is not configured")]
    UnknownDefaultNetwork(String),
}

/// Loads the deployment configuration from a TOML file. Relative paths in
/// the `[paths]` section are resolved against the file's directory.
pub async fn load(path: &Path) -> Result<Config, LoadError> {
    let data = fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let config = parse(&data, root).map_err(|err| match err {
        LoadError::Syntax { .. } => LoadError::Syntax {
            path: path.to_owned(),
        },
        err => err,
    })?;
    tracing::debug!(?path, networks = ?config.networks.keys(), "loaded configuration");
    Ok(config)
}

/// Parses a configuration from TOML, resolving relative paths against
/// `root`.
pub fn parse(data: &str, root: &Path) -> Result<Config, LoadError> {
    let mut config: Config = toml::de::from_str(data).map_err(|_| LoadError::Syntax {
        path: PathBuf::new(),
    })?;
    config.paths.resolve_against(root);

    let localhost_only =
        config.networks.is_empty() && crate::DEVELOPMENT_NETWORKS.contains(&&*config.default_network);
    if !localhost_only && !config.networks.contains_key(&config.default_network) {
        return Err(LoadError::UnknownDefaultNetwork(config.default_network));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{AccountRef, Accounts, NamedAccount, Solidity},
        std::time::Duration,
    };

    const CONFIG: &str = r#"
        default-network = "sepolia"
        nome = "token3"
        verify-contract = true
        block-confirmations = 6
        solidity = "0.8.17"

        [paths]
        artifacts = "build/artifacts"
        deployments = "/var/lib/deployments"

        [networks.localhost]
        chain-id = 31337

        [networks.sepolia]
        url = "https://rpc.sepolia.org"
        chain-id = 11155111
        accounts = ["0x0000000000000000000000000000000000000000000000000000000000000001"]
        polling-interval = "4s"

        [named-accounts]
        deployer = 0

        [deploy-parameters]
        bid-time-tolerance = 300
        auction-duration = 86400
        initial-bid = "0.01"
        perc-increment = 5
        executor-min-delay = 3600
        executor-proposers = []
        executors = []
        quorum-percentage = 4
        voting-period = 45818
        voting-delay = 1
        veto-until = 1700000000
    "#;

    #[test]
    fn parses_full_config() {
        let config = parse(CONFIG, Path::new("/project")).unwrap();

        assert_eq!(config.default_network, "sepolia");
        assert_eq!(config.name, "token3");
        assert!(config.verify_contract);
        assert_eq!(config.confirmations(), 6);
        assert_eq!(config.solidity, Some(Solidity::Version("0.8.17".into())));
        assert_eq!(
            config.named_accounts["deployer"],
            NamedAccount::Fixed(AccountRef::Index(0))
        );

        let sepolia = config.network("sepolia").unwrap();
        assert_eq!(sepolia.chain_id, Some(11155111));
        assert_eq!(sepolia.polling_interval, Duration::from_secs(4));
        assert!(matches!(&sepolia.accounts, Accounts::PrivateKeys(keys) if keys.len() == 1));
        assert!(sepolia.is_live("sepolia"));

        let localhost = config.network("localhost").unwrap();
        assert_eq!(localhost.url.as_str(), "http://127.0.0.1:8545/");
        assert!(matches!(localhost.accounts, Accounts::Remote(_)));
        assert!(!localhost.is_live("localhost"));
    }

    #[test]
    fn resolves_relative_paths() {
        let config = parse(CONFIG, Path::new("/project")).unwrap();

        assert_eq!(
            config.paths.artifacts,
            Path::new("/project/build/artifacts")
        );
        assert_eq!(config.paths.deployments, Path::new("/var/lib/deployments"));
        assert_eq!(config.paths.sources, Path::new("/project/contracts"));
    }

    #[test]
    fn rejects_unknown_default_network() {
        let config = CONFIG.replace(
            r#"default-network = "sepolia""#,
            r#"default-network = "mainnet""#,
        );

        assert!(matches!(
            parse(&config, Path::new(".")),
            Err(LoadError::UnknownDefaultNetwork(network)) if network == "mainnet"
        ));
    }

    #[test]
    fn syntax_error_hides_details() {
        let config = CONFIG.replace("[named-accounts]", "[named-accounts");

        let err = parse(&config, Path::new(".")).unwrap_err();
        assert!(matches!(err, LoadError::Syntax { .. }));
        assert!(!err.to_string().contains("0x000000"));
    }

    #[test]
    fn mnemonic_accounts_are_redacted() {
        let config = CONFIG.replace(
            r#"accounts = ["0x0000000000000000000000000000000000000000000000000000000000000001"]"#,
            r#"accounts = { mnemonic = "test test test test test test test test test test test junk", count = 3 }"#,
        );

        let config = parse(&config, Path::new(".")).unwrap();
        let accounts = &config.network("sepolia").unwrap().accounts;
        let Accounts::Mnemonic(mnemonic) = accounts else {
            panic!("expected mnemonic accounts");
        };
        assert_eq!(mnemonic.count, 3);
        assert_eq!(mnemonic.initial_index, 0);
        assert!(!format!("{accounts:?}").contains("junk"));
    }

    #[test]
    fn sample_config_is_valid() {
        let config = parse(include_str!("../../../deploy.toml"), Path::new(".")).unwrap();

        assert_eq!(config.default_network, "localhost");
        assert_eq!(config.solidity.unwrap().versions(), vec!["0.8.17"]);
        assert!(matches!(
            config.networks["sepolia"].accounts,
            Accounts::Mnemonic(_)
        ));
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let config = load(&path).await.unwrap();
        assert_eq!(config.paths.artifacts, dir.path().join("build/artifacts"));

        let missing = load(&dir.path().join("missing.toml")).await;
        assert!(matches!(missing, Err(LoadError::Io { .. })));
    }
}
