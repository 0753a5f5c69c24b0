mod address_pair;
mod chain;
mod chain_price_pair;
mod direction;
mod price_error;
mod price_quote;
mod token;

pub use address_pair::{AddressPair, TokenAddresses};
pub use chain::{Chain, ProviderScope};
pub use chain_price_pair::{ChainPricePair, PriceFields, SelectedPrice};
pub use direction::{BridgeDirection, DirectionHint};
pub use price_error::PriceError;
pub use price_quote::PriceQuote;
pub use token::{BridgeTransaction, BridgedToken, Pagination, TokenTransactionsPage};
