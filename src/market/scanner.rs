//! Cross-exchange spread scanning.

use crate::domain::{Exchange, Opportunity};

/// Finds ordered exchange pairs whose spread exceeds a minimum threshold.
#[derive(Debug, Clone, Copy)]
pub struct OpportunityScanner {
    min_profit_threshold: f64,
}

impl OpportunityScanner {
    pub fn new(min_profit_threshold: f64) -> Self {
        Self {
            min_profit_threshold,
        }
    }

    pub fn min_profit_threshold(&self) -> f64 {
        self.min_profit_threshold
    }

    /// Checks all N*(N-1) ordered pairs (buy on `i`, sell on `j`).
    ///
    /// A pair is kept only when its spread is strictly greater than the
    /// threshold. Results come out in outer-then-inner index order.
    pub fn scan(&self, exchanges: &[Exchange]) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();

        for (i, buy) in exchanges.iter().enumerate() {
            for (j, sell) in exchanges.iter().enumerate() {
                if i == j {
                    continue;
                }

                let buy_price = buy.current_price();
                let sell_price = sell.current_price();
                let profit_percentage = (sell_price - buy_price) / buy_price;

                if profit_percentage > self.min_profit_threshold {
                    opportunities.push(Opportunity {
                        buy_index: i,
                        sell_index: j,
                        buy_exchange: buy.name().to_string(),
                        sell_exchange: sell.name().to_string(),
                        buy_price,
                        sell_price,
                        profit_percentage,
                    });
                }
            }
        }

        opportunities
    }
}

/// Picks the opportunity with the largest spread.
///
/// Exact ties go to the one enumerated first. The tie-break carries no
/// meaning beyond being stable.
pub fn select_best(opportunities: &[Opportunity]) -> Option<&Opportunity> {
    let mut best: Option<&Opportunity> = None;
    for opp in opportunities {
        match best {
            Some(current) if opp.profit_percentage <= current.profit_percentage => {}
            _ => best = Some(opp),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchanges(prices: &[f64]) -> Vec<Exchange> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Exchange::new(format!("ex{}", i), *p, 0.0).unwrap())
            .collect()
    }

    fn opp(buy_index: usize, sell_index: usize, profit_percentage: f64) -> Opportunity {
        Opportunity {
            buy_index,
            sell_index,
            buy_exchange: format!("ex{}", buy_index),
            sell_exchange: format!("ex{}", sell_index),
            buy_price: 1.0,
            sell_price: 1.0 + profit_percentage,
            profit_percentage,
        }
    }

    #[test]
    fn test_empty_exchange_set() {
        let scanner = OpportunityScanner::new(0.0);
        assert!(scanner.scan(&[]).is_empty());
    }

    #[test]
    fn test_single_exchange_has_no_pairs() {
        let scanner = OpportunityScanner::new(-1.0);
        assert!(scanner.scan(&exchanges(&[100.0])).is_empty());
    }

    #[test]
    fn test_finds_cheap_to_expensive_direction() {
        let scanner = OpportunityScanner::new(0.05);
        let result = scanner.scan(&exchanges(&[100.0, 110.0]));

        assert_eq!(result.len(), 1);
        let o = &result[0];
        assert_eq!((o.buy_index, o.sell_index), (0, 1));
        assert_eq!(o.buy_exchange, "ex0");
        assert_eq!(o.sell_exchange, "ex1");
        assert!((o.profit_percentage - 0.10).abs() < 1e-12);
        assert!((o.expected_profit(2.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_spread_equal_to_threshold_is_excluded() {
        let scanner = OpportunityScanner::new(0.5);
        // (150 - 100) / 100 is exactly 0.5.
        assert!(scanner.scan(&exchanges(&[100.0, 150.0])).is_empty());

        let scanner = OpportunityScanner::new(0.4999);
        assert_eq!(scanner.scan(&exchanges(&[100.0, 150.0])).len(), 1);
    }

    #[test]
    fn test_both_directions_with_negative_threshold() {
        let scanner = OpportunityScanner::new(-0.5);
        let result = scanner.scan(&exchanges(&[100.0, 101.0]));

        let pairs: Vec<_> = result.iter().map(|o| (o.buy_index, o.sell_index)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_ordered_pair_enumeration() {
        let scanner = OpportunityScanner::new(-1.0);
        let result = scanner.scan(&exchanges(&[1.0, 2.0, 3.0]));

        let pairs: Vec<_> = result.iter().map(|o| (o.buy_index, o.sell_index)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_identical_prices_never_qualify() {
        let scanner = OpportunityScanner::new(0.0001);
        assert!(scanner.scan(&exchanges(&[50.0, 50.0, 50.0])).is_empty());
    }

    #[test]
    fn test_select_best_takes_maximum() {
        let opps = vec![opp(0, 1, 0.01), opp(0, 2, 0.03), opp(1, 2, 0.02)];
        let best = select_best(&opps).unwrap();
        assert_eq!((best.buy_index, best.sell_index), (0, 2));
    }

    #[test]
    fn test_select_best_tie_goes_to_first() {
        let opps = vec![opp(0, 1, 0.02), opp(1, 2, 0.03), opp(2, 0, 0.03)];
        let best = select_best(&opps).unwrap();
        assert_eq!((best.buy_index, best.sell_index), (1, 2));
    }

    #[test]
    fn test_select_best_empty() {
        assert!(select_best(&[]).is_none());
    }
}
