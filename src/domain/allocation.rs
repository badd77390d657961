//! Forward-looking allocation snapshot.

use chrono::NaiveDate;

use super::panel::{Panel, Series};

/// One line of the target allocation table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetAllocation {
    pub ticker: String,
    /// True when the asset carries weight into the next session.
    pub long: bool,
    pub weight: f64,
}

/// What to hold starting next session: the last computed weight row, the
/// matching cash residual and the latest risk-free rate. A pure read of
/// already-computed state — nothing is re-derived here.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSnapshot {
    pub as_of: NaiveDate,
    pub assets: Vec<AssetAllocation>,
    pub cash_weight: f64,
    pub riskfree: f64,
}

impl AllocationSnapshot {
    pub fn take(
        prices: &Panel,
        weights: &[Vec<f64>],
        cash: &[f64],
        riskfree: &Series,
    ) -> Option<Self> {
        let last = prices.n_rows().checked_sub(1)?;
        let weight_row = weights.last()?;

        let assets = prices
            .tickers()
            .iter()
            .zip(weight_row)
            .map(|(ticker, &weight)| AssetAllocation {
                ticker: ticker.clone(),
                long: weight > 0.0,
                weight,
            })
            .collect();

        Some(AllocationSnapshot {
            as_of: prices.date(last),
            assets,
            cash_weight: *cash.last()?,
            riskfree: riskfree.last()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_inputs() -> (Panel, Vec<Vec<f64>>, Vec<f64>, Series) {
        let dates = vec![date(2024, 1, 1), date(2024, 1, 2)];
        let panel = Panel::new(
            dates.clone(),
            vec!["QQQ".into(), "SPY".into()],
            vec![vec![400.0, 470.0], vec![404.0, 468.0]],
        )
        .unwrap();
        let weights = vec![vec![0.0, 0.0], vec![0.55, 0.0]];
        let cash = vec![1.0, 0.45];
        let riskfree = Series::new(dates, vec![0.05, 0.053]).unwrap();
        (panel, weights, cash, riskfree)
    }

    #[test]
    fn snapshot_reads_last_row() {
        let (panel, weights, cash, riskfree) = sample_inputs();
        let snap = AllocationSnapshot::take(&panel, &weights, &cash, &riskfree).unwrap();

        assert_eq!(snap.as_of, date(2024, 1, 2));
        assert_eq!(snap.assets.len(), 2);
        assert_eq!(snap.assets[0].ticker, "QQQ");
        assert!(snap.assets[0].long);
        assert!((snap.assets[0].weight - 0.55).abs() < 1e-12);
        assert!(!snap.assets[1].long);
        assert_eq!(snap.assets[1].weight, 0.0);
        assert!((snap.cash_weight - 0.45).abs() < 1e-12);
        assert!((snap.riskfree - 0.053).abs() < 1e-12);
    }

    #[test]
    fn snapshot_none_for_empty_panel() {
        let panel = Panel::new(vec![], vec!["SPY".into()], vec![]).unwrap();
        let riskfree = Series::new(vec![], vec![]).unwrap();
        assert!(AllocationSnapshot::take(&panel, &[], &[], &riskfree).is_none());
    }
}
