use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cryptochain")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "mine", about = "Mine reward blocks on a fresh chain and print it as JSON")]
    Mine {
        #[arg(long = "blocks", help = "Number of blocks to mine (defaults to blocks_to_mine)")]
        blocks: Option<usize>,
        #[arg(long = "miner", help = "Address credited with the rewards")]
        miner: Option<String>,
    },
    #[command(name = "validate", about = "Validate a chain stored as JSON")]
    Validate {
        #[arg(help = "Path to the chain file")]
        file: PathBuf,
    },
    #[command(name = "balance", about = "Compute an address's balance over a stored chain")]
    Balance {
        #[arg(help = "Path to the chain file")]
        file: PathBuf,
        #[arg(help = "The wallet address")]
        address: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mine_with_blocks() {
        let opt = Opt::try_parse_from(["cryptochain", "mine", "--blocks", "5"]).unwrap();
        match opt.command {
            Command::Mine { blocks, miner } => {
                assert_eq!(blocks, Some(5));
                assert_eq!(miner, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_balance_with_config() {
        let opt = Opt::try_parse_from([
            "cryptochain",
            "balance",
            "chain.json",
            "04abcd",
            "--config",
            "node.toml",
        ])
        .unwrap();
        assert_eq!(opt.config, Some(PathBuf::from("node.toml")));
        assert!(matches!(
            opt.command,
            Command::Balance { ref address, .. } if address == "04abcd"
        ));
    }

    #[test]
    fn test_validate_requires_file() {
        assert!(Opt::try_parse_from(["cryptochain", "validate"]).is_err());
    }
}
