pub mod bridge_interactor;
pub mod price_interactor;

pub use bridge_interactor::{BridgeInteractor, BridgeInteractorImpl};
pub use price_interactor::{PriceInteractor, PriceInteractorImpl};
