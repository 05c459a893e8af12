pub mod quote;

pub use quote::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};
