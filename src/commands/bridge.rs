use super::{CommandHandler, LatestArgs, TokenArgs, TopArgs};
use crate::di::ServiceContainer;
use crate::presenter::bridge_presenter::{BridgePresenter, BridgePresenterImpl};
use crate::view::bridge_view::ConsoleBridgeView;
use crate::view::console::Console;
use anyhow::Result;
use std::sync::Arc;

pub struct LatestCommand;

impl CommandHandler for LatestCommand {
    type Args = LatestArgs;

    fn command_name() -> &'static str {
        "latest"
    }

    fn description() -> &'static str {
        "show the latest bridge transactions"
    }

    async fn execute(
        args: LatestArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let interactor = services.bridge_interactor();
        let view = Arc::new(ConsoleBridgeView::new(console));
        let presenter = BridgePresenterImpl::new(interactor, view);

        presenter.show_latest(args.limit, args.direction).await
    }
}

pub struct TopTokensCommand;

impl CommandHandler for TopTokensCommand {
    type Args = TopArgs;

    fn command_name() -> &'static str {
        "top"
    }

    fn description() -> &'static str {
        "show top bridged tokens by market cap"
    }

    async fn execute(
        args: TopArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let interactor = services.bridge_interactor();
        let view = Arc::new(ConsoleBridgeView::new(console));
        let presenter = BridgePresenterImpl::new(interactor, view);

        presenter.show_top_tokens(args.limit, args.direction).await
    }
}

pub struct TokenHistoryCommand;

impl CommandHandler for TokenHistoryCommand {
    type Args = TokenArgs;

    fn command_name() -> &'static str {
        "token"
    }

    fn description() -> &'static str {
        "show the bridge history of a token"
    }

    async fn execute(
        args: TokenArgs,
        console: Arc<Console>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let interactor = services.bridge_interactor();
        let view = Arc::new(ConsoleBridgeView::new(console));
        let presenter = BridgePresenterImpl::new(interactor, view);

        presenter
            .show_token_history(&args.address, args.page, args.limit)
            .await
    }
}
