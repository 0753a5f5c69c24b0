pub mod bridge_view;
pub mod console;
pub mod price_view;

pub use bridge_view::{BridgeView, ConsoleBridgeView};
pub use console::{Console, OutputFormat};
pub use price_view::{ConsolePriceView, PriceView};
