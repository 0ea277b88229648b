//! Whole-share position sizing against a budget.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionSize {
    pub shares: u64,
    pub invested: f64,
}

/// Largest share count below which f64 still counts in whole shares (2^53).
const EXACT_SHARE_LIMIT: f64 = 9_007_199_254_740_992.0;

/// floor(budget / price) shares. Non-positive or non-finite inputs size to zero.
pub fn size_position(budget: f64, price: f64) -> PositionSize {
    if !(budget > 0.0 && price > 0.0) || !budget.is_finite() || !price.is_finite() {
        return PositionSize::default();
    }

    let quotient = (budget / price).floor();
    let mut shares = if quotient >= u64::MAX as f64 { u64::MAX } else { quotient as u64 };
    // The quotient can land one share off either side of an integer boundary.
    // Past 2^53 one share is below f64 resolution, so step down by whole ulps.
    while shares > 0 && shares as f64 * price > budget {
        let step = (shares as f64 * f64::EPSILON).max(1.0) as u64;
        shares = shares.saturating_sub(step);
    }
    if quotient < EXACT_SHARE_LIMIT {
        while let Some(next) = shares.checked_add(1).filter(|&n| n as f64 * price <= budget) {
            shares = next;
        }
    }

    PositionSize {
        shares,
        invested: shares as f64 * price,
    }
}

/// Slice of `capital` given by a percentage allocation.
pub fn allocation_budget(capital: f64, position_size_pct: f64) -> f64 {
    capital * (position_size_pct / 100.0)
}
