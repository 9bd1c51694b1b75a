//! String literal types used across the lemon.markets APIs.
//!
//! These accept any string on decode; see [`literal!`](crate::literal!).

crate::literal! {
    /// Type of a financial instrument.
    pub enum InstrumentType {
        /// Stock
        Stock = "stock",
        /// Bond
        Bond = "bond",
        /// Warrant
        Warrant = "warrant",
        /// Fund
        Fund = "fund",
        /// Exchange-traded fund
        Etf = "etf",
    }
}

crate::literal! {
    /// Result ordering.
    pub enum Sorting {
        /// Oldest first
        Asc = "asc",
        /// Newest first
        Desc = "desc",
    }
}

crate::literal! {
    /// Account mode reported by the trading API.
    pub enum TradingMode {
        /// Paper trading
        Paper = "paper",
        /// Live trading
        Money = "money",
    }
}

crate::literal! {
    /// Subscription plan.
    pub enum Plan {
        /// Free plan
        Go = "go",
        /// Investor plan
        Investor = "investor",
        /// Trader plan
        Trader = "trader",
    }
}

crate::literal! {
    /// Side of an order.
    pub enum OrderSide {
        /// Buy
        Buy = "buy",
        /// Sell
        Sell = "sell",
    }
}

crate::literal! {
    /// Lifecycle state of an order.
    pub enum OrderStatus {
        /// Created, awaiting activation
        Inactive = "inactive",
        /// Activated, awaiting placement
        Activated = "activated",
        /// Placed at the venue
        Open = "open",
        /// Being executed
        InProgress = "in_progress",
        /// Cancellation requested
        Canceling = "canceling",
        /// Fully executed
        Executed = "executed",
        /// Canceled
        Canceled = "canceled",
        /// Expired
        Expired = "expired",
        /// Rejected by the venue
        Rejected = "rejected",
    }
}

crate::literal! {
    /// Order type, derived from the stop and limit prices.
    pub enum OrderType {
        /// Market order
        Market = "market",
        /// Stop order
        Stop = "stop",
        /// Limit order
        Limit = "limit",
        /// Stop-limit order
        StopLimit = "stop_limit",
    }
}

crate::literal! {
    /// Venue an order can be routed to.
    pub enum OrderVenue {
        /// Börse München (gettex)
        Xmun = "xmun",
        /// lemon.markets all-day venue
        Allday = "allday",
    }
}

crate::literal! {
    /// Type of a bank statement entry.
    pub enum BankStatementType {
        /// Deposit
        PayIn = "pay_in",
        /// Withdrawal
        PayOut = "pay_out",
        /// Buy order settlement
        OrderBuy = "order_buy",
        /// Sell order settlement
        OrderSell = "order_sell",
        /// Dividend payment
        Dividend = "dividend",
        /// Tax refund
        TaxRefund = "tax_refund",
        /// Interest paid
        InterestPaid = "interest_paid",
        /// Interest earned
        InterestEarned = "interest_earned",
        /// End-of-day balance
        EodBalance = "eod_balance",
    }
}

crate::literal! {
    /// Type of a position statement.
    pub enum StatementType {
        /// Shares bought
        OrderBuy = "order_buy",
        /// Shares sold
        OrderSell = "order_sell",
        /// Stock split
        Split = "split",
        /// Position imported
        Import = "import",
        /// Subscription rights
        Snx = "snx",
    }
}

/// Bar length for OHLC requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OhlcPeriod {
    /// One minute
    M1,
    /// One hour
    H1,
    /// One day
    D1,
}

impl OhlcPeriod {
    /// Path segment for this period.
    pub fn as_str(&self) -> &'static str {
        match self {
            OhlcPeriod::M1 => "m1",
            OhlcPeriod::H1 => "h1",
            OhlcPeriod::D1 => "d1",
        }
    }
}

impl std::fmt::Display for OhlcPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_variants() {
        assert_eq!(OrderStatus::InProgress.as_str(), "in_progress");
        assert_eq!(OrderStatus::new("in_progress"), OrderStatus::InProgress);
        assert_eq!(OrderType::VALUES.len(), 4);
        assert_eq!(InstrumentType::new("etf"), InstrumentType::Etf);
        assert_eq!(Sorting::Desc.to_string(), "desc");
    }

    #[test]
    fn test_unknown_literal_passes_through() {
        let status = OrderStatus::new("partially_executed");
        assert_eq!(status, OrderStatus::Other("partially_executed".to_string()));
        assert!(!status.is_known());
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!("partially_executed")
        );
    }

    #[test]
    fn test_ohlc_period() {
        assert_eq!(OhlcPeriod::H1.as_str(), "h1");
        assert_eq!(OhlcPeriod::D1.to_string(), "d1");
    }
}
