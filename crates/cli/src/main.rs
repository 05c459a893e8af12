//! Command Line Interface for the token swap engine.
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{Settings, parse_curve, parse_fee};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tswap_domain::curve::Curve;
use tswap_domain::enums::Side;
use tswap_domain::fees::Fee;
use tswap_execution::PoolId;
use tswap_execution::ledger::{AccountId, AssetId};
use tswap_execution::orchestrator::{CreatePool, PoolOrchestrator};
use tswap_execution::store::{JsonFileStore, MemoryStore, StateStore};

#[derive(Parser)]
#[command(name = "tswap")]
#[command(about = "Two-asset liquidity pool engine CLI", long_about = None)]
struct Cli {
    /// State file (overrides TSWAP_STATE_FILE)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Host account credited with the host fee on swaps (overrides TSWAP_HOST_FEE_ACCOUNT)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::A => Side::A,
            SideArg::B => Side::B,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Credit an account with tokens (faucet)
    Fund {
        #[arg(long)]
        account: String,
        #[arg(long)]
        asset: String,
        #[arg(long)]
        amount: u128,
    },
    /// Create a pool from the creator's balances
    Create {
        #[arg(long)]
        creator: String,
        /// Account receiving owner fees (defaults to the creator)
        #[arg(long)]
        operator: Option<String>,
        #[arg(long)]
        mint_a: String,
        #[arg(long)]
        mint_b: String,
        #[arg(long)]
        amount_a: u128,
        #[arg(long)]
        amount_b: u128,
        /// constant-product or constant-price:<num>/<den>
        #[arg(long, value_parser = curve_arg)]
        curve: Option<Curve>,
        #[arg(long)]
        bootstrap_shares: Option<u128>,
        /// <num>/<den>
        #[arg(long, value_parser = fee_arg)]
        trade_fee: Option<Fee>,
        #[arg(long, value_parser = fee_arg)]
        owner_trade_fee: Option<Fee>,
        #[arg(long, value_parser = fee_arg)]
        owner_withdraw_fee: Option<Fee>,
        #[arg(long, value_parser = fee_arg)]
        host_fee: Option<Fee>,
    },
    /// Deposit both assets for an exact amount of shares
    Deposit {
        #[arg(long)]
        pool: PoolId,
        #[arg(long)]
        account: String,
        #[arg(long)]
        shares: u128,
        #[arg(long, default_value_t = u128::MAX)]
        max_a: u128,
        #[arg(long, default_value_t = u128::MAX)]
        max_b: u128,
    },
    /// Redeem shares for both assets
    Withdraw {
        #[arg(long)]
        pool: PoolId,
        #[arg(long)]
        account: String,
        #[arg(long)]
        shares: u128,
        #[arg(long, default_value_t = 0)]
        min_a: u128,
        #[arg(long, default_value_t = 0)]
        min_b: u128,
    },
    /// Swap an exact input amount
    Swap {
        #[arg(long)]
        pool: PoolId,
        #[arg(long)]
        account: String,
        #[arg(long, value_enum)]
        source: SideArg,
        #[arg(long)]
        amount_in: u128,
        #[arg(long, default_value_t = 0)]
        min_out: u128,
    },
    /// Quote a swap without executing it
    Quote {
        #[arg(long)]
        pool: PoolId,
        #[arg(long, value_enum)]
        source: SideArg,
        #[arg(long)]
        amount_in: u128,
    },
    /// Deposit an exact amount of one asset
    DepositSingle {
        #[arg(long)]
        pool: PoolId,
        #[arg(long)]
        account: String,
        #[arg(long, value_enum)]
        side: SideArg,
        #[arg(long)]
        amount_in: u128,
        #[arg(long, default_value_t = 0)]
        min_shares: u128,
    },
    /// Withdraw an exact amount of one asset
    WithdrawSingle {
        #[arg(long)]
        pool: PoolId,
        #[arg(long)]
        account: String,
        #[arg(long, value_enum)]
        side: SideArg,
        #[arg(long)]
        amount_out: u128,
        #[arg(long, default_value_t = u128::MAX)]
        max_shares: u128,
    },
    /// Show one pool, or list all pools
    Show {
        #[arg(long)]
        pool: Option<PoolId>,
    },
    /// Show the balances of an account
    Balances {
        #[arg(long)]
        account: String,
    },
    /// Replay the reference scenario on an in-memory pool
    Demo,
}

fn fee_arg(s: &str) -> Result<Fee, String> {
    parse_fee(s).map_err(|e| e.to_string())
}

fn curve_arg(s: &str) -> Result<Curve, String> {
    parse_curve(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(state) = cli.state {
        settings.state_file = state;
    }
    if let Some(host) = cli.host {
        settings.host_account = Some(AccountId::new(host));
    }

    let store = Arc::new(JsonFileStore::new(settings.state_file.clone()));
    let orchestrator = PoolOrchestrator::new(store).await?;
    run(cli.command, &settings, &orchestrator).await
}

async fn run<S: StateStore>(
    command: Commands,
    settings: &Settings,
    orchestrator: &PoolOrchestrator<S>,
) -> Result<()> {
    match command {
        Commands::Fund {
            account,
            asset,
            amount,
        } => {
            let (account, asset) = (AccountId::new(account), AssetId::new(asset));
            orchestrator.fund(&account, &asset, amount).await?;
            println!(
                "Funded {account} with {amount} {asset} (balance {})",
                orchestrator.balance(&account, &asset).await
            );
        }
        Commands::Create {
            creator,
            operator,
            mint_a,
            mint_b,
            amount_a,
            amount_b,
            curve,
            bootstrap_shares,
            trade_fee,
            owner_trade_fee,
            owner_withdraw_fee,
            host_fee,
        } => {
            let mut config = settings.pool;
            let fees = &mut config.fee_schedule;
            fees.trade_fee = trade_fee.unwrap_or(fees.trade_fee);
            fees.owner_trade_fee = owner_trade_fee.unwrap_or(fees.owner_trade_fee);
            fees.owner_withdraw_fee = owner_withdraw_fee.unwrap_or(fees.owner_withdraw_fee);
            fees.host_fee = host_fee.unwrap_or(fees.host_fee);
            config.curve = curve.unwrap_or(config.curve);
            config.bootstrap_shares = bootstrap_shares.unwrap_or(config.bootstrap_shares);

            let record = orchestrator
                .create_pool(CreatePool {
                    creator: AccountId::new(creator),
                    operator: operator.map(AccountId::new),
                    mint_a: AssetId::new(mint_a),
                    mint_b: AssetId::new(mint_b),
                    amount_a,
                    amount_b,
                    config,
                })
                .await?;
            output::print_pool(&record);
        }
        Commands::Deposit {
            pool,
            account,
            shares,
            max_a,
            max_b,
        } => {
            let quote = orchestrator
                .deposit(pool, &AccountId::new(account), shares, max_a, max_b)
                .await?;
            output::print_deposit(&quote);
        }
        Commands::Withdraw {
            pool,
            account,
            shares,
            min_a,
            min_b,
        } => {
            let quote = orchestrator
                .withdraw(pool, &AccountId::new(account), shares, min_a, min_b)
                .await?;
            output::print_withdraw(&quote);
        }
        Commands::Swap {
            pool,
            account,
            source,
            amount_in,
            min_out,
        } => {
            let quote = orchestrator
                .swap(
                    pool,
                    &AccountId::new(account),
                    source.into(),
                    amount_in,
                    min_out,
                    settings.host_account.as_ref(),
                )
                .await?;
            output::print_swap(&quote);
        }
        Commands::Quote {
            pool,
            source,
            amount_in,
        } => {
            let quote = orchestrator
                .quote_swap(
                    pool,
                    source.into(),
                    amount_in,
                    0,
                    settings.host_account.is_some(),
                )
                .await?;
            output::print_swap(&quote);
        }
        Commands::DepositSingle {
            pool,
            account,
            side,
            amount_in,
            min_shares,
        } => {
            let quote = orchestrator
                .deposit_single(
                    pool,
                    &AccountId::new(account),
                    side.into(),
                    amount_in,
                    min_shares,
                )
                .await?;
            output::print_single_deposit(&quote);
        }
        Commands::WithdrawSingle {
            pool,
            account,
            side,
            amount_out,
            max_shares,
        } => {
            let quote = orchestrator
                .withdraw_single(
                    pool,
                    &AccountId::new(account),
                    side.into(),
                    amount_out,
                    max_shares,
                )
                .await?;
            output::print_single_withdraw(&quote);
        }
        Commands::Show { pool: Some(id) } => {
            output::print_pool(&orchestrator.pool(id).await?);
        }
        Commands::Show { pool: None } => {
            output::print_pools(&orchestrator.pools().await?);
        }
        Commands::Balances { account } => {
            output::print_balances(&orchestrator.ledger().await, &AccountId::new(account));
        }
        Commands::Demo => demo(settings).await?,
    }
    Ok(())
}

/// Creates a 1,000,000/1,000,000 pool, deposits and withdraws 10,000,000
/// shares, then swaps 100,000 A for B.
async fn demo(settings: &Settings) -> Result<()> {
    let orchestrator = PoolOrchestrator::new(Arc::new(MemoryStore::new())).await?;
    let owner = AccountId::new("owner");
    let user = AccountId::new("user");
    let (token_a, token_b) = (AssetId::new("TOKEN-A"), AssetId::new("TOKEN-B"));

    for account in [&owner, &user] {
        orchestrator.fund(account, &token_a, 1_000_000_000).await?;
        orchestrator.fund(account, &token_b, 1_000_000_000).await?;
    }

    println!("Creating pool");
    let record = orchestrator
        .create_pool(CreatePool {
            creator: owner.clone(),
            operator: None,
            mint_a: token_a.clone(),
            mint_b: token_b.clone(),
            amount_a: 1_000_000,
            amount_b: 1_000_000,
            config: settings.pool,
        })
        .await?;
    let id = record.id;
    output::print_pool(&record);

    println!("Depositing 10000000 shares");
    output::print_deposit(
        &orchestrator
            .deposit(id, &user, 10_000_000, u128::MAX, u128::MAX)
            .await?,
    );

    println!("Withdrawing 10000000 shares");
    output::print_withdraw(&orchestrator.withdraw(id, &user, 10_000_000, 0, 0).await?);

    println!("Swapping 100000 A for B");
    let quote = orchestrator
        .swap(id, &user, Side::A, 100_000, 0, settings.host_account.as_ref())
        .await?;
    output::print_swap(&quote);

    let record = orchestrator
        .pool(id)
        .await
        .context("demo pool disappeared")?;
    output::print_pool(&record);
    info!(pool = %id, amount_out = quote.amount_out, "Demo finished");
    Ok(())
}
