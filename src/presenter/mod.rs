pub mod bridge_presenter;
pub mod price_presenter;

pub use bridge_presenter::{BridgePresenter, BridgePresenterImpl};
pub use price_presenter::{PricePresenter, PricePresenterImpl};
