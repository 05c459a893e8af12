//! Pool configuration resolved from defaults, environment and flags.

use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use tswap_domain::config::PoolConfig;
use tswap_domain::curve::Curve;
use tswap_domain::fees::Fee;
use tswap_execution::ledger::AccountId;

/// State file used when neither `--state` nor `TSWAP_STATE_FILE` is given.
pub const DEFAULT_STATE_FILE: &str = "tswap-state.json";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Configuration applied to newly created pools.
    pub pool: PoolConfig,
    pub state_file: PathBuf,
    /// Account receiving the host portion of swap fees.
    pub host_account: Option<AccountId>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, starting from the reference defaults.
    ///
    /// A host account disables the withdraw fee unless the withdraw fee is
    /// set explicitly.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut pool = PoolConfig::default();
        let host_account = lookup("TSWAP_HOST_FEE_ACCOUNT")
            .filter(|v| !v.is_empty())
            .map(AccountId::new);
        if host_account.is_some() {
            pool.fee_schedule.owner_withdraw_fee = Fee::zero();
        }

        let fees = &mut pool.fee_schedule;
        override_fee(&lookup, "TSWAP_TRADE_FEE", &mut fees.trade_fee)?;
        override_fee(&lookup, "TSWAP_OWNER_TRADE_FEE", &mut fees.owner_trade_fee)?;
        override_fee(&lookup, "TSWAP_OWNER_WITHDRAW_FEE", &mut fees.owner_withdraw_fee)?;
        override_fee(&lookup, "TSWAP_HOST_FEE", &mut fees.host_fee)?;

        if let Some(shares) = lookup("TSWAP_BOOTSTRAP_SHARES") {
            pool.bootstrap_shares = parse_u128("TSWAP_BOOTSTRAP_SHARES", &shares)?;
        }
        if let Some(curve) = lookup("TSWAP_CURVE") {
            pool.curve = parse_curve(&curve)?;
        }

        let state_file = lookup("TSWAP_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        Ok(Self {
            pool,
            state_file,
            host_account,
        })
    }
}

fn override_fee(
    lookup: &impl Fn(&str) -> Option<String>,
    prefix: &str,
    fee: &mut Fee,
) -> Result<()> {
    let numerator_key = format!("{prefix}_NUMERATOR");
    let denominator_key = format!("{prefix}_DENOMINATOR");
    if let Some(v) = lookup(&numerator_key) {
        fee.numerator = parse_u128(&numerator_key, &v)?;
    }
    if let Some(v) = lookup(&denominator_key) {
        fee.denominator = parse_u128(&denominator_key, &v)?;
    }
    Ok(())
}

fn parse_u128(key: &str, value: &str) -> Result<u128> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be an unsigned integer, got {value:?}"))
}

/// Parses `numerator/denominator`.
pub fn parse_fee(s: &str) -> Result<Fee> {
    let (n, d) = s
        .split_once('/')
        .ok_or_else(|| anyhow!("expected <numerator>/<denominator>, got {s:?}"))?;
    Ok(Fee::new(parse_u128("numerator", n)?, parse_u128("denominator", d)?))
}

/// Parses `constant-product` or `constant-price:<num>/<den>`.
pub fn parse_curve(s: &str) -> Result<Curve> {
    let s = s.trim();
    if s == "constant-product" {
        return Ok(Curve::ConstantProduct);
    }
    if let Some(rate) = s.strip_prefix("constant-price:") {
        let rate = parse_fee(rate)?;
        return Ok(Curve::constant_price(rate.numerator, rate.denominator)?);
    }
    bail!("unknown curve {s:?}, expected constant-product or constant-price:<num>/<den>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.pool, PoolConfig::default());
        assert_eq!(s.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert!(s.host_account.is_none());
    }

    #[test]
    fn test_host_account_disables_withdraw_fee() {
        let s = settings(&[("TSWAP_HOST_FEE_ACCOUNT", "host")]).unwrap();
        assert_eq!(s.host_account, Some(AccountId::new("host")));
        assert!(!s.pool.fee_schedule.owner_withdraw_fee.is_enabled());
    }

    #[test]
    fn test_env_overrides() {
        let s = settings(&[
            ("TSWAP_TRADE_FEE_NUMERATOR", "30"),
            ("TSWAP_TRADE_FEE_DENOMINATOR", "1000"),
            ("TSWAP_BOOTSTRAP_SHARES", "500"),
            ("TSWAP_CURVE", "constant-price:2/1"),
            ("TSWAP_STATE_FILE", "/tmp/pools.json"),
        ])
        .unwrap();
        assert_eq!(s.pool.fee_schedule.trade_fee, Fee::new(30, 1000));
        assert_eq!(s.pool.bootstrap_shares, 500);
        assert_eq!(
            s.pool.curve,
            Curve::ConstantPrice {
                numerator: 2,
                denominator: 1
            }
        );
        assert_eq!(s.state_file, PathBuf::from("/tmp/pools.json"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(settings(&[("TSWAP_BOOTSTRAP_SHARES", "-1")]).is_err());
        assert!(parse_curve("stable").is_err());
        assert!(parse_curve("constant-price:0/1").is_err());
        assert!(parse_fee("25").is_err());
    }
}
