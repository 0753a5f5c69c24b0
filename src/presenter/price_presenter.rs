use crate::entity::{DirectionHint, TokenAddresses};
use crate::interactor::price_interactor::PriceInteractor;
use crate::view::price_view::PriceView;
use anyhow::Result;
use async_trait::async_trait;
use log::error;
use std::sync::Arc;

#[async_trait]
pub trait PricePresenter: Send + Sync {
    async fn show_price(&self, address: &str) -> Result<()>;
    async fn show_both_chains(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
    ) -> Result<()>;
    async fn show_preferred_price(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
        hint: DirectionHint,
    ) -> Result<()>;
    async fn show_batch(&self, tokens: &[TokenAddresses]) -> Result<()>;
}

pub struct PricePresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> PricePresenterImpl<I, V>
where
    I: PriceInteractor,
    V: PriceView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> PricePresenter for PricePresenterImpl<I, V>
where
    I: PriceInteractor + Send + Sync,
    V: PriceView + Send + Sync,
{
    async fn show_price(&self, address: &str) -> Result<()> {
        self.view.display_loading(address).await?;

        match self.interactor.get_price(address).await {
            Ok(resolved) => {
                self.view.display_price(address, &resolved.price).await?;
            }
            Err(e) => {
                error!("Price lookup for {} failed: {}", address, e);
                self.view.display_error(&e).await?;
            }
        }

        Ok(())
    }

    async fn show_both_chains(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
    ) -> Result<()> {
        self.view.display_loading(evm_address).await?;

        match self
            .interactor
            .get_prices_both_chains(evm_address, solana_address)
            .await
        {
            Ok(prices) => {
                self.view.display_chain_prices(evm_address, &prices).await?;
            }
            Err(e) => {
                error!("Price lookup for {} failed: {}", evm_address, e);
                self.view.display_error(&e).await?;
            }
        }

        Ok(())
    }

    async fn show_preferred_price(
        &self,
        evm_address: &str,
        solana_address: Option<&str>,
        hint: DirectionHint,
    ) -> Result<()> {
        self.view.display_loading(evm_address).await?;

        match self
            .interactor
            .get_preferred_price(Some(evm_address), solana_address, hint)
            .await
        {
            Ok(price) => {
                self.view.display_price(evm_address, &price).await?;
            }
            Err(e) => {
                error!("Price lookup for {} failed: {}", evm_address, e);
                self.view.display_error(&e).await?;
            }
        }

        Ok(())
    }

    async fn show_batch(&self, tokens: &[TokenAddresses]) -> Result<()> {
        let prices = self.interactor.update_prices(tokens).await;
        self.view.display_batch(&prices).await
    }
}
