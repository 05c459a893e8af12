//! Table rendering for command results.

use prettytable::{Table, row};
use tswap_domain::enums::Side;
use tswap_domain::value_objects::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};
use tswap_execution::ledger::{AccountId, Ledger};
use tswap_execution::record::PoolRecord;

pub fn print_pool(record: &PoolRecord) {
    let pool = &record.pool;
    let fees = pool.fee_schedule();
    let mut table = Table::new();
    table.add_row(row!["Pool", record.id]);
    table.add_row(row!["Curve", format!("{:?}", pool.curve())]);
    table.add_row(row!["Operator", record.operator]);
    table.add_row(row![format!("Reserve A ({})", record.mint_a), pool.reserve_a()]);
    table.add_row(row![format!("Reserve B ({})", record.mint_b), pool.reserve_b()]);
    table.add_row(row!["Share supply", pool.share_supply()]);
    table.add_row(row!["Fee shares collected", pool.accumulated_owner_fee_shares()]);
    table.add_row(row!["Invariant", pool.invariant()]);
    for side in [Side::A, Side::B] {
        let price = pool
            .spot_price(side)
            .map(|p| p.to_string())
            .unwrap_or_else(|e| e.to_string());
        table.add_row(row![format!("Spot price {side:?}"), price]);
    }
    table.add_row(row![
        "Trade / owner trade fee",
        format!(
            "{}/{} + {}/{}",
            fees.trade_fee.numerator,
            fees.trade_fee.denominator,
            fees.owner_trade_fee.numerator,
            fees.owner_trade_fee.denominator
        )
    ]);
    table.add_row(row![
        "Withdraw / host fee",
        format!(
            "{}/{} , {}/{}",
            fees.owner_withdraw_fee.numerator,
            fees.owner_withdraw_fee.denominator,
            fees.host_fee.numerator,
            fees.host_fee.denominator
        )
    ]);
    table.add_row(row!["Updated", record.updated_at.format("%Y-%m-%d %H:%M:%S")]);
    table.printstd();
}

pub fn print_pools(records: &[PoolRecord]) {
    let mut table = Table::new();
    table.add_row(row!["Pool", "A", "Reserve A", "B", "Reserve B", "Shares"]);
    for r in records {
        table.add_row(row![
            r.id,
            r.mint_a,
            r.pool.reserve_a(),
            r.mint_b,
            r.pool.reserve_b(),
            r.pool.share_supply()
        ]);
    }
    table.printstd();
}

pub fn print_balances(ledger: &Ledger, account: &AccountId) {
    let mut table = Table::new();
    table.add_row(row!["Asset", "Balance"]);
    for (asset, amount) in ledger.balances_of(account) {
        table.add_row(row![asset, amount]);
    }
    table.printstd();
}

pub fn print_swap(quote: &SwapQuote) {
    let mut table = Table::new();
    table.add_row(row!["Source", format!("{:?}", quote.source)]);
    table.add_row(row!["Amount in", quote.amount_in]);
    table.add_row(row!["Amount in after fees", quote.amount_in_after_fee]);
    table.add_row(row!["Amount out", quote.amount_out]);
    table.add_row(row!["LP fee", quote.trade_fee]);
    table.add_row(row!["Owner fee", quote.owner_fee]);
    table.add_row(row!["Host fee", quote.host_fee]);
    table.printstd();
}

pub fn print_deposit(quote: &DepositQuote) {
    let mut table = Table::new();
    table.add_row(row!["Shares minted", quote.shares]);
    table.add_row(row!["Paid A", quote.amount_a]);
    table.add_row(row!["Paid B", quote.amount_b]);
    table.printstd();
}

pub fn print_withdraw(quote: &WithdrawQuote) {
    let mut table = Table::new();
    table.add_row(row!["Shares surrendered", quote.shares]);
    table.add_row(row!["Fee shares", quote.fee_shares]);
    table.add_row(row!["Received A", quote.amount_a]);
    table.add_row(row!["Received B", quote.amount_b]);
    table.printstd();
}

pub fn print_single_deposit(quote: &SingleDepositQuote) {
    let mut table = Table::new();
    table.add_row(row!["Side", format!("{:?}", quote.side)]);
    table.add_row(row!["Paid", quote.amount_in]);
    table.add_row(row!["Shares minted", quote.shares]);
    table.add_row(row!["LP fee", quote.trade_fee]);
    table.add_row(row!["Owner fee", quote.owner_fee]);
    table.printstd();
}

pub fn print_single_withdraw(quote: &SingleWithdrawQuote) {
    let mut table = Table::new();
    table.add_row(row!["Side", format!("{:?}", quote.side)]);
    table.add_row(row!["Received", quote.amount_out]);
    table.add_row(row!["Shares surrendered", quote.shares]);
    table.add_row(row!["Fee shares", quote.fee_shares]);
    table.add_row(row!["LP fee", quote.trade_fee]);
    table.add_row(row!["Owner fee", quote.owner_fee]);
    table.printstd();
}
