use serde::Deserialize;

/// Solidity compiler settings.
///
/// Either a bare version string, a single compiler table or a list of
/// compilers for projects mixing pragma versions.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Solidity {
    Version(String),
    Compiler(Compiler),
    Compilers { compilers: Vec<Compiler> },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Compiler {
    pub version: String,
    #[serde(default)]
    pub optimizer: Optimizer,
    pub evm_version: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Optimizer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_runs")]
    pub runs: u32,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: default_runs(),
        }
    }
}

impl Solidity {
    pub fn versions(&self) -> Vec<&str> {
        match self {
            Self::Version(version) => vec![version.as_str()],
            Self::Compiler(compiler) => vec![compiler.version.as_str()],
            Self::Compilers { compilers } => compilers
                .iter()
                .map(|compiler| compiler.version.as_str())
                .collect(),
        }
    }
}

fn default_runs() -> u32 {
    200
}
