//! Synthetic trade history for demos.
//!
//! Produces a plausible, always-profitable trade log spread over past days,
//! plus statistics with a per-day profit breakdown, without running the
//! engine.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::domain::{ArbitrageRecord, DailyProfit, RunningStats, Trade, TradeSide};
use crate::storage::{StorageError, TradeStore};

/// Exchange names used in generated trades.
pub const SAMPLE_EXCHANGES: [&str; 5] = ["Binance", "Coinbase", "Kraken", "Huobi", "FTX"];

/// Longest history `generate` produces; larger requests are capped.
pub const MAX_DAYS: u32 = 3650;
/// Highest average daily trade count `generate` honors.
pub const MAX_TRADES_PER_DAY: u32 = 1000;

const SECONDS_PER_DAY: i64 = 86_400;

/// Sample generator settings.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Days of history, ending yesterday.
    pub days: u32,
    /// Average trades per day; each day gets this many give or take two.
    pub trades_per_day: u32,
    /// Asset price the buy legs scatter around (+/- 5%).
    pub base_price: f64,
    pub start_balance: f64,
    pub asset_balance: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            days: 30,
            trades_per_day: 5,
            base_price: 50_000.0,
            start_balance: 1000.0,
            asset_balance: 10.0,
        }
    }
}

/// A generated trade log and the statistics describing it.
#[derive(Debug, Clone)]
pub struct SampleData {
    pub trades: Vec<ArbitrageRecord>,
    pub stats: RunningStats,
}

/// Generates `cfg.days` days of history ending the day before `now`.
///
/// `days` and `trades_per_day` are capped at [`MAX_DAYS`] and
/// [`MAX_TRADES_PER_DAY`]. Days that fall outside the calendar range are
/// skipped.
pub fn generate<R: Rng + ?Sized>(
    cfg: &SampleConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> SampleData {
    let days = cfg.days.min(MAX_DAYS);
    let trades_per_day = cfg.trades_per_day.min(MAX_TRADES_PER_DAY);

    let mut trades = Vec::new();
    let mut stats = RunningStats::new(cfg.start_balance, cfg.asset_balance);
    let mut daily_profits = Vec::new();

    let min_trades = trades_per_day.saturating_sub(2).max(1);
    let max_trades = trades_per_day.saturating_add(2).max(min_trades);

    for back in (1..=days).rev() {
        let Some(day_start) = now.checked_sub_signed(TimeDelta::days(i64::from(back))) else {
            continue;
        };
        let date = day_start.date_naive();
        let midnight = date.and_time(NaiveTime::MIN).and_utc();

        let mut day_trades: Vec<ArbitrageRecord> = (0..rng.gen_range(min_trades..=max_trades))
            .map(|_| {
                let offset = TimeDelta::seconds(rng.gen_range(0..SECONDS_PER_DAY));
                sample_trade(cfg.base_price, rng, midnight + offset)
            })
            .collect();
        day_trades.sort_by_key(|t| t.timestamp);

        let mut day_profit = 0.0;
        for trade in &day_trades {
            day_profit += trade.profit;
            let balance = stats.current_balance + trade.profit;
            stats.record_trade(trade.is_profitable(), trade.profit, balance, cfg.asset_balance);
        }

        daily_profits.push(DailyProfit {
            date,
            profit: day_profit,
        });
        trades.extend(day_trades);
    }

    stats.daily_profits = Some(daily_profits);
    SampleData { trades, stats }
}

/// Replaces the store's documents with the sample.
pub async fn write_sample(store: &dyn TradeStore, data: &SampleData) -> Result<(), StorageError> {
    store.overwrite(&data.trades, &data.stats).await?;

    info!(
        trades = data.trades.len(),
        total_profit = data.stats.total_profit,
        final_balance = data.stats.current_balance,
        "Sample data written"
    );
    Ok(())
}

fn sample_trade<R: Rng + ?Sized>(
    base_price: f64,
    rng: &mut R,
    timestamp: DateTime<Utc>,
) -> ArbitrageRecord {
    let mut pair = SAMPLE_EXCHANGES.choose_multiple(rng, 2);
    let buy_exchange = *pair.next().unwrap_or(&SAMPLE_EXCHANGES[0]);
    let sell_exchange = *pair.next().unwrap_or(&SAMPLE_EXCHANGES[1]);

    let buy_price = base_price * (1.0 + rng.gen_range(-0.05_f64..=0.05));
    let sell_price = buy_price * (1.0 + rng.gen_range(0.001_f64..=0.02));
    let amount = rng.gen_range(0.1_f64..=0.5);

    let leg = |exchange: &str, side, price| Trade {
        exchange: exchange.to_string(),
        side,
        amount,
        price,
        timestamp,
    };

    let mut record = ArbitrageRecord::from_legs(
        leg(buy_exchange, TradeSide::Buy, buy_price),
        leg(sell_exchange, TradeSide::Sell, sell_price),
        (sell_price - buy_price) / buy_price,
    );
    record.timestamp = timestamp;
    record
}
