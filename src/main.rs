// Entry point for the cryptochain demo binary
use clap::Parser;
use cryptochain::{
    calculate_balance, validate_chain, validate_transaction_data, Block, BlockchainError,
    ChainEvent, Command, DifficultyAdjustment, Node, Opt, Settings, Wallet, GLOBAL_CONFIG,
};
use log::{error, info};
use std::path::Path;
use std::process;

fn main() {
    let opt = Opt::parse();

    // Settings must be loaded before the logger so LOG_LEVEL takes effect
    if let Some(path) = &opt.config {
        match Settings::from_file(path) {
            Ok(settings) => {
                GLOBAL_CONFIG.load(settings.with_overrides(|key| std::env::var(key).ok()))
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }

    let level = match GLOBAL_CONFIG.settings().level_filter() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    env_logger::builder().filter_level(level).init();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn read_chain(path: &Path) -> Result<Vec<Block>, BlockchainError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Mine { blocks, miner } => {
            let blocks = blocks.unwrap_or_else(|| GLOBAL_CONFIG.settings().blocks_to_mine);
            let miner = match miner.or_else(|| GLOBAL_CONFIG.get_mining_addr()) {
                Some(addr) => addr,
                None => Wallet::new()?.address().to_string(),
            };
            GLOBAL_CONFIG.set_mining_addr(miner.clone());

            info!(
                "Node {} mining {blocks} blocks for {miner} (target block time {} ms)",
                GLOBAL_CONFIG.get_node_id(),
                DifficultyAdjustment::get_target_block_time()
            );

            let (node, events) = Node::new();
            for _ in 0..blocks {
                if node.mine_transactions(&miner).join().is_none() {
                    return Err("Mining attempt was abandoned".into());
                }
                for event in events.try_iter() {
                    if let ChainEvent::Extended(block) = event {
                        info!(
                            "Block {} mined at difficulty {}: {}",
                            block.index(),
                            block.difficulty(),
                            block.hash()
                        );
                    }
                }
            }

            println!("{}", node.broadcast_payload()?);
        }
        Command::Validate { file } => {
            let chain = read_chain(&file)?;
            validate_chain(&chain).map_err(BlockchainError::from)?;
            validate_transaction_data(&chain)?;
            println!("Chain of length {} is valid", chain.len());
        }
        Command::Balance { file, address } => {
            let chain = read_chain(&file)?;
            let balance = calculate_balance(&chain, &address);
            println!("Balance of {address}: {balance}");
        }
    }
    Ok(())
}
