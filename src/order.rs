use crate::config::DEFAULT_RECV_WINDOW;
use crate::enums::{OrderSide, OrderType};
use crate::error::{MexcError, Result};

/// New order request for `/api/v3/order` and `/api/v3/order/test`.
///
/// ```
/// use mexc_client::{NewOrder, OrderSide, OrderType};
///
/// let order = NewOrder::new("BTCUSDT", OrderSide::Buy, OrderType::Limit)
///     .quantity("0.001")
///     .price("42000,50");
///
/// assert_eq!(order.price.as_deref(), Some("42000.50"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Option<String>,
    pub quote_order_qty: Option<String>,
    pub price: Option<String>,
    pub new_client_order_id: Option<String>,
    pub recv_window: Option<u64>,
}

impl NewOrder {
    pub fn new(symbol: impl Into<String>, side: OrderSide, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity: None,
            quote_order_qty: None,
            price: None,
            new_client_order_id: None,
            recv_window: None,
        }
    }

    pub fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = non_empty(quantity.into());
        self
    }

    pub fn quote_order_qty(mut self, quote_order_qty: impl Into<String>) -> Self {
        self.quote_order_qty = non_empty(quote_order_qty.into());
        self
    }

    /// Decimal commas are accepted and sent as dots.
    pub fn price(mut self, price: impl Into<String>) -> Self {
        self.price = non_empty(price.into().replace(',', "."));
        self
    }

    pub fn new_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = non_empty(id.into());
        self
    }

    pub fn recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(MexcError::InvalidParameter("symbol must not be empty".to_string()));
        }

        if self.quantity.is_none() && self.quote_order_qty.is_none() {
            return Err(MexcError::InvalidParameter(
                "either quantity or quoteOrderQty is required".to_string(),
            ));
        }

        if self.order_type.requires_price() && self.price.is_none() {
            return Err(MexcError::InvalidParameter(format!(
                "price is required for {} orders",
                self.order_type
            )));
        }

        if let Some(recv_window) = self.recv_window {
            if recv_window == 0 || recv_window > DEFAULT_RECV_WINDOW {
                return Err(MexcError::InvalidParameter(format!(
                    "recvWindow must be between 1 and {} ms, got {}",
                    DEFAULT_RECV_WINDOW, recv_window
                )));
            }
        }

        Ok(())
    }

    /// Request parameters in signing order. `timestamp` is always last.
    pub fn query_pairs(&self, default_recv_window: u64, timestamp_ms: i64) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.order_type.as_str().to_string()),
        ];

        if let Some(quantity) = &self.quantity {
            pairs.push(("quantity", quantity.clone()));
        }
        if let Some(quote_order_qty) = &self.quote_order_qty {
            pairs.push(("quoteOrderQty", quote_order_qty.clone()));
        }
        if let Some(price) = &self.price {
            pairs.push(("price", price.clone()));
        }
        if let Some(id) = &self.new_client_order_id {
            pairs.push(("newClientOrderId", id.clone()));
        }

        let recv_window = self.recv_window.unwrap_or(default_recv_window);
        pairs.push(("recvWindow", recv_window.to_string()));
        pairs.push(("timestamp", timestamp_ms.to_string()));

        pairs
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
