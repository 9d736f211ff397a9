//! Per-run statistics for the engine.

/// Counters for the current run only. The persisted statistics span runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub ticks: u64,
    pub opportunities_detected: u64,
    pub ticks_with_opportunities: u64,
    pub trades_executed: u64,
    pub profitable_trades: u64,
    pub persist_failures: u64,
    pub total_profit: f64,
    /// Quote value bought plus sold.
    pub total_volume: f64,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
}

impl TickStats {
    pub(super) fn record_trade(&mut self, profit: f64, volume: f64) {
        self.trades_executed += 1;
        if profit > 0.0 {
            self.profitable_trades += 1;
        }
        self.total_profit += profit;
        self.total_volume += volume;
        self.best_trade = Some(self.best_trade.map_or(profit, |b| b.max(profit)));
        self.worst_trade = Some(self.worst_trade.map_or(profit, |w| w.min(profit)));
    }
}

/// Outcome of a completed simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub stats: TickStats,
    /// Balance before the first tick.
    pub opening_balance: f64,
    pub final_balance: f64,
}
