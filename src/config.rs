use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_ALGOD_URL: &str = "https://testnet-api.algonode.cloud";
pub const DEFAULT_FAUCET_URL: &str = "https://api.dispenser.algorandfoundation.tools/fund/0";

/// Daily send quotas
#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub free_daily_limit: f64,
    pub pro_daily_limit: f64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            free_daily_limit: 1_000.0,
            pro_daily_limit: 10_000.0,
        }
    }
}

/// Behaviour of the simulated mobile money and bank rails
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub mobile_money_failure_rate: f64,
    pub bank_failure_rate: f64,
    pub mobile_money_min: f64,
    pub mobile_money_max: f64,
    pub bank_min: f64,
    pub bank_max: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: 2_000,
            max_delay_ms: 3_000,
            mobile_money_failure_rate: 0.10,
            bank_failure_rate: 0.05,
            mobile_money_min: 1.0,
            mobile_money_max: 1_000.0,
            bank_min: 10.0,
            bank_max: 10_000.0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub algod_url: String,
    #[serde(default)]
    pub algod_token: Option<String>,
    pub faucet_url: String,
    #[serde(default)]
    pub faucet_token: Option<String>,
    /// ALGO requested per faucet call
    pub faucet_amount: f64,
    pub refresh_interval_secs: u64,
    pub confirmation_poll_ms: u64,
    pub confirmation_max_attempts: u32,
    /// Annual percentage yield of simulated investments
    pub apy_rate: f64,
    pub limits: LimitSettings,
    pub simulation: SimulationSettings,
}

impl AppConfig {
    /// Defaults overlaid with environment variables. Nested keys use `__`,
    /// e.g. `SIMULATION__BANK_FAILURE_RATE=0.2`.
    pub fn from_env() -> Result<Self> {
        let limits = LimitSettings::default();
        let simulation = SimulationSettings::default();

        ::config::Config::builder()
            .set_default("algod_url", DEFAULT_ALGOD_URL)?
            .set_default("faucet_url", DEFAULT_FAUCET_URL)?
            .set_default("faucet_amount", 10.0)?
            .set_default("refresh_interval_secs", 30_i64)?
            .set_default("confirmation_poll_ms", 1_000_i64)?
            .set_default("confirmation_max_attempts", 10_i64)?
            .set_default("apy_rate", 5.0)?
            .set_default("limits.free_daily_limit", limits.free_daily_limit)?
            .set_default("limits.pro_daily_limit", limits.pro_daily_limit)?
            .set_default("simulation.min_delay_ms", simulation.min_delay_ms as i64)?
            .set_default("simulation.max_delay_ms", simulation.max_delay_ms as i64)?
            .set_default(
                "simulation.mobile_money_failure_rate",
                simulation.mobile_money_failure_rate,
            )?
            .set_default("simulation.bank_failure_rate", simulation.bank_failure_rate)?
            .set_default("simulation.mobile_money_min", simulation.mobile_money_min)?
            .set_default("simulation.mobile_money_max", simulation.mobile_money_max)?
            .set_default("simulation.bank_min", simulation.bank_min)?
            .set_default("simulation.bank_max", simulation.bank_max)?
            .add_source(
                ::config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("TELEGRAM_BOT_TOKEN and DATABASE_URL must be set in environment variables")
    }
}
