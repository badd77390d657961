//! Risk-budgeted position sizing and leverage capping.

/// Equal risk-budget weights across the currently eligible assets.
///
/// Per row: `weight = (target_vol / active) / vol`, so each active
/// position contributes roughly the same risk. Assets without a signal
/// get zero. Undefined, zero or negative volatility is infinite risk —
/// the weight is zero, never a division fault.
pub fn size_weights(
    eligible: &[Vec<bool>],
    vol: &[Vec<Option<f64>>],
    target_vol: f64,
) -> Vec<Vec<f64>> {
    eligible
        .iter()
        .zip(vol)
        .map(|(signal_row, vol_row)| {
            let active = signal_row.iter().filter(|&&s| s).count();
            signal_row
                .iter()
                .zip(vol_row)
                .map(|(&signal, &v)| {
                    if !signal || active == 0 {
                        return 0.0;
                    }
                    match v {
                        Some(v) if v > 0.0 => {
                            let w = (target_vol / active as f64) / v;
                            if w.is_finite() { w } else { 0.0 }
                        }
                        _ => 0.0,
                    }
                })
                .collect()
        })
        .collect()
}

/// Rescale any row whose gross exposure exceeds the ceiling, preserving
/// the proportions between assets. Guarantees `sum(row) <= ceiling`.
pub fn cap_leverage(weights: &mut [Vec<f64>], ceiling: f64) {
    for row in weights.iter_mut() {
        let gross: f64 = row.iter().sum();
        if gross > ceiling {
            let scale = ceiling / gross;
            for w in row.iter_mut() {
                *w *= scale;
            }
        }
    }
}

/// Un-invested residual per row: `1 - sum(weights)`. Negative when the
/// ceiling allows gross exposure above 100% — leveraged, by design.
pub fn cash_weights(weights: &[Vec<f64>]) -> Vec<f64> {
    weights
        .iter()
        .map(|row| 1.0 - row.iter().sum::<f64>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_vol_weighting() {
        let eligible = vec![vec![true, true]];
        let vol = vec![vec![Some(0.10), Some(0.20)]];
        let weights = size_weights(&eligible, &vol, 0.12);

        // budget per asset = 0.12 / 2 = 0.06
        assert!((weights[0][0] - 0.6).abs() < 1e-12);
        assert!((weights[0][1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn no_signal_means_no_weight() {
        let eligible = vec![vec![false, true]];
        let vol = vec![vec![Some(0.10), Some(0.10)]];
        let weights = size_weights(&eligible, &vol, 0.12);

        assert_eq!(weights[0][0], 0.0);
        assert!(weights[0][1] > 0.0);
    }

    #[test]
    fn all_ineligible_row_is_zero() {
        let eligible = vec![vec![false, false]];
        let vol = vec![vec![Some(0.10), Some(0.10)]];
        let weights = size_weights(&eligible, &vol, 0.12);

        assert_eq!(weights[0], vec![0.0, 0.0]);
    }

    #[test]
    fn undefined_vol_is_infinite_risk() {
        let eligible = vec![vec![true, true]];
        let vol = vec![vec![None, Some(0.10)]];
        let weights = size_weights(&eligible, &vol, 0.12);

        assert_eq!(weights[0][0], 0.0);
        // the undefined asset still consumes its share of the risk budget
        assert!((weights[0][1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_vol_is_infinite_risk() {
        let eligible = vec![vec![true]];
        let vol = vec![vec![Some(0.0)]];
        let weights = size_weights(&eligible, &vol, 0.12);

        assert_eq!(weights[0][0], 0.0);
    }

    #[test]
    fn cap_scales_breaching_row_proportionally() {
        let mut weights = vec![vec![0.8, 0.8, 0.8]];
        cap_leverage(&mut weights, 1.5);

        // gross 2.4 → scale 0.625
        for w in &weights[0] {
            assert!((w - 0.5).abs() < 1e-12);
        }
        let gross: f64 = weights[0].iter().sum();
        assert!((gross - 1.5).abs() < 1e-12);
    }

    #[test]
    fn cap_leaves_compliant_row_unchanged() {
        let mut weights = vec![vec![0.4, 0.3]];
        cap_leverage(&mut weights, 1.5);

        assert!((weights[0][0] - 0.4).abs() < 1e-12);
        assert!((weights[0][1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn cap_applies_per_row() {
        let mut weights = vec![vec![1.0, 1.0], vec![0.2, 0.2]];
        cap_leverage(&mut weights, 1.5);

        assert!((weights[0].iter().sum::<f64>() - 1.5).abs() < 1e-12);
        assert!((weights[1].iter().sum::<f64>() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn cash_is_exact_residual() {
        let weights = vec![vec![0.4, 0.3], vec![0.0, 0.0], vec![0.9, 0.6]];
        let cash = cash_weights(&weights);

        assert!((cash[0] - 0.3).abs() < 1e-12);
        assert!((cash[1] - 1.0).abs() < 1e-12);
        // leveraged row: residual goes negative
        assert!((cash[2] - (-0.5)).abs() < 1e-12);
    }
}
