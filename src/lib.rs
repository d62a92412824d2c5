//! Async client for the MEXC spot REST API (`/api/v3`).
//!
//! ```no_run
//! use mexc_client::{ClientConfig, MexcClient};
//!
//! # async fn run() -> mexc_client::Result<()> {
//! let client = MexcClient::new(ClientConfig::from_env()?)?;
//! let book = client.order_book("BTCUSDT", Some(20)).await?;
//! println!("best bid: {:?}", book.bids.first());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod enums;
pub mod error;
pub mod logging;
pub mod models;
pub mod order;
pub mod signature;

pub use client::{KlineQuery, MexcClient};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ClientConfig, Credentials};
pub use enums::{KlineInterval, OrderSide, OrderType};
pub use error::{MexcError, Result};
pub use models::*;
pub use order::NewOrder;
