use crate::entity::BridgeDirection;
use crate::interactor::bridge_interactor::BridgeInteractor;
use crate::view::bridge_view::BridgeView;
use anyhow::Result;
use async_trait::async_trait;
use log::error;
use std::sync::Arc;

#[async_trait]
pub trait BridgePresenter: Send + Sync {
    async fn show_latest(&self, limit: u32, direction: Option<BridgeDirection>) -> Result<()>;
    async fn show_token_history(&self, token_address: &str, page: u32, limit: u32) -> Result<()>;
    async fn show_top_tokens(&self, limit: u32, direction: Option<BridgeDirection>) -> Result<()>;
}

pub struct BridgePresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> BridgePresenterImpl<I, V>
where
    I: BridgeInteractor,
    V: BridgeView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> BridgePresenter for BridgePresenterImpl<I, V>
where
    I: BridgeInteractor + Send + Sync,
    V: BridgeView + Send + Sync,
{
    async fn show_latest(&self, limit: u32, direction: Option<BridgeDirection>) -> Result<()> {
        match self.interactor.latest_transactions(limit, direction).await {
            Ok(transactions) => self.view.display_transactions(&transactions).await,
            Err(e) => {
                error!("Failed to fetch latest bridge transactions: {}", e);
                self.view.display_error(&e).await
            }
        }
    }

    async fn show_token_history(&self, token_address: &str, page: u32, limit: u32) -> Result<()> {
        match self
            .interactor
            .token_transactions(token_address, page, limit)
            .await
        {
            Ok(history) => self.view.display_token_page(&history).await,
            Err(e) => {
                error!("Failed to fetch bridge history for {}: {}", token_address, e);
                self.view.display_error(&e).await
            }
        }
    }

    async fn show_top_tokens(&self, limit: u32, direction: Option<BridgeDirection>) -> Result<()> {
        match self.interactor.top_tokens_with_prices(limit, direction).await {
            Ok(tokens) => self.view.display_top_tokens(&tokens).await,
            Err(e) => {
                error!("Failed to fetch top bridged tokens: {}", e);
                self.view.display_error(&e).await
            }
        }
    }
}
