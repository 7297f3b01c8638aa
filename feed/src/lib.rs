pub mod binance;
pub mod error;

pub use binance::BinanceSource;
pub use error::FeedError;
