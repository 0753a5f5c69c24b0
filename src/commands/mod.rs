use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::sync::Arc;

use crate::di::ServiceContainer;
use crate::entity::{BridgeDirection, TokenAddresses};
use crate::view::console::{Console, OutputFormat};

pub mod bridge;
pub mod price;

pub const DEFAULT_TRANSACTION_LIMIT: u32 = 20;
pub const DEFAULT_TOP_TOKENS_LIMIT: u32 = 10;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// Parsed arguments of the subcommand
    type Args;

    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for logs
    fn description() -> &'static str;

    /// Execute the command
    async fn execute(
        args: Self::Args,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Price of a token given its Base or Solana address
    Price(PriceArgs),

    /// Prices of a bridged token on both chains
    Both(BothArgs),

    /// Batch prices for many tokens, each given as EVM[:SOLANA]
    Batch(BatchArgs),

    /// Latest bridge transactions
    Latest(LatestArgs),

    /// Top bridged tokens by market cap, with live prices
    Top(TopArgs),

    /// Bridge history of one token
    Token(TokenArgs),
}

#[derive(Args)]
pub struct PriceArgs {
    /// EVM address (0x...) or Solana mint (base58)
    pub address: String,
}

#[derive(Args)]
pub struct BothArgs {
    /// EVM address of the token on Base
    pub evm_address: String,

    /// Solana mint, base58 or bytes32 hex; looked up in the indexer when omitted
    #[arg(long)]
    pub solana: Option<String>,

    /// Bridge direction; prints a single preferred price when given
    #[arg(long)]
    pub direction: Option<BridgeDirection>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Tokens as EVM or EVM:SOLANA
    #[arg(required = true, value_parser = parse_token_addresses)]
    pub tokens: Vec<TokenAddresses>,
}

#[derive(Args)]
pub struct LatestArgs {
    #[arg(long, default_value_t = DEFAULT_TRANSACTION_LIMIT)]
    pub limit: u32,

    /// solana-to-base or base-to-solana
    #[arg(long)]
    pub direction: Option<BridgeDirection>,
}

#[derive(Args)]
pub struct TopArgs {
    #[arg(long, default_value_t = DEFAULT_TOP_TOKENS_LIMIT)]
    pub limit: u32,

    /// solana-to-base or base-to-solana
    #[arg(long)]
    pub direction: Option<BridgeDirection>,
}

#[derive(Args)]
pub struct TokenArgs {
    /// EVM address of the token on Base
    pub address: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_TRANSACTION_LIMIT)]
    pub limit: u32,
}

/// Parse `EVM` or `EVM:SOLANA` into a batch entry
pub fn parse_token_addresses(s: &str) -> std::result::Result<TokenAddresses, String> {
    let (evm, solana) = match s.split_once(':') {
        Some((evm, solana)) => (evm.trim(), Some(solana.trim())),
        None => (s.trim(), None),
    };

    if evm.is_empty() {
        return Err(format!("'{}' has no EVM address", s));
    }

    Ok(TokenAddresses {
        evm_address: evm.to_string(),
        solana_address: solana.filter(|v| !v.is_empty()).map(str::to_string),
    })
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli, services: Arc<ServiceContainer>) -> Result<()> {
    let console = Arc::new(Console::stdout(cli.output_format()));

    match cli.cmd {
        Command::Price(args) => execute::<price::PriceCommand>(args, console, services).await,
        Command::Both(args) => execute::<price::BothChainsCommand>(args, console, services).await,
        Command::Batch(args) => execute::<price::BatchCommand>(args, console, services).await,
        Command::Latest(args) => execute::<bridge::LatestCommand>(args, console, services).await,
        Command::Top(args) => execute::<bridge::TopTokensCommand>(args, console, services).await,
        Command::Token(args) => {
            execute::<bridge::TokenHistoryCommand>(args, console, services).await
        }
    }
}

async fn execute<C: CommandHandler>(
    args: C::Args,
    console: Arc<Console>,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("Running '{}': {}", C::command_name(), C::description());
    C::execute(args, console, services).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_addresses() {
        let token = parse_token_addresses(
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913:EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        )
        .unwrap();
        assert_eq!(token.evm_address, "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913");
        assert_eq!(
            token.solana_address.as_deref(),
            Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
        );

        let token = parse_token_addresses("0xabc").unwrap();
        assert!(token.solana_address.is_none());

        assert!(parse_token_addresses(":EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from([
            "bridge-prices",
            "--json",
            "both",
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
            "--direction",
            "solana-to-base",
        ]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
        match cli.cmd {
            Command::Both(args) => {
                assert_eq!(args.direction, Some(BridgeDirection::SolanaToBase));
                assert!(args.solana.is_none());
            }
            _ => panic!("expected the both subcommand"),
        }

        let cli = Cli::parse_from(["bridge-prices", "top", "--limit", "5"]);
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(matches!(cli.cmd, Command::Top(TopArgs { limit: 5, direction: None })));
    }

    #[test]
    fn test_cli_rejects_unknown_direction() {
        assert!(Cli::try_parse_from(["bridge-prices", "latest", "--direction", "sideways"]).is_err());
    }
}
