use super::{BatchArgs, BothArgs, CommandHandler, PriceArgs};
use crate::di::ServiceContainer;
use crate::entity::DirectionHint;
use crate::presenter::price_presenter::{PricePresenter, PricePresenterImpl};
use crate::view::console::Console;
use crate::view::price_view::ConsolePriceView;
use anyhow::Result;
use log::info;
use std::sync::Arc;

pub struct PriceCommand;

impl CommandHandler for PriceCommand {
    type Args = PriceArgs;

    fn command_name() -> &'static str {
        "price"
    }

    fn description() -> &'static str {
        "get price for a token on either chain"
    }

    async fn execute(
        args: PriceArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Price command received for token: {}", args.address);

        let interactor = services.price_interactor();
        let view = Arc::new(ConsolePriceView::new(console));
        let presenter = PricePresenterImpl::new(interactor, view);

        presenter.show_price(&args.address).await
    }
}

pub struct BothChainsCommand;

impl CommandHandler for BothChainsCommand {
    type Args = BothArgs;

    fn command_name() -> &'static str {
        "both"
    }

    fn description() -> &'static str {
        "get prices for a bridged token on Base and Solana"
    }

    async fn execute(
        args: BothArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let interactor = services.price_interactor();
        let view = Arc::new(ConsolePriceView::new(console));
        let presenter = PricePresenterImpl::new(interactor, view);

        match args.direction {
            Some(direction) => {
                presenter
                    .show_preferred_price(
                        &args.evm_address,
                        args.solana.as_deref(),
                        DirectionHint::from(direction),
                    )
                    .await
            }
            None => {
                presenter
                    .show_both_chains(&args.evm_address, args.solana.as_deref())
                    .await
            }
        }
    }
}

pub struct BatchCommand;

impl CommandHandler for BatchCommand {
    type Args = BatchArgs;

    fn command_name() -> &'static str {
        "batch"
    }

    fn description() -> &'static str {
        "get prices for many tokens in batched calls"
    }

    async fn execute(
        args: BatchArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Batch price command received for {} tokens", args.tokens.len());

        let interactor = services.price_interactor();
        let view = Arc::new(ConsolePriceView::new(console));
        let presenter = PricePresenterImpl::new(interactor, view);

        presenter.show_batch(&args.tokens).await
    }
}
