use crate::registry::Token;
use alloy_primitives::U256;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Bounds and rounding rules for one spend decision, in human units.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AmountPolicy {
    pub min: f64,
    pub max: f64,
    /// Fraction of the balance the draw may touch, 0.0..=1.0.
    pub percent_of_balance_cap: f64,
    /// Decimal places the result is floored to; one is picked at random.
    pub precision_steps: Vec<u8>,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self { min: 0.001, max: 0.05, percent_of_balance_cap: 0.1, precision_steps: vec![1, 2, 3] }
    }
}

impl AmountPolicy {
    pub fn new(min: f64, max: f64, percent_of_balance_cap: f64) -> Self {
        Self { min, max, percent_of_balance_cap, ..Self::default() }
    }

    pub fn with_precision_steps(mut self, steps: Vec<u8>) -> Self {
        self.precision_steps = steps;
        self
    }
}

/// Resolve a token's decimals, falling back to 18. The fallback gets its own
/// log line so misconfigured catalogs are visible in one grep.
pub fn resolve_decimals(token: &Token) -> u8 {
    match token.decimals() {
        Some(decimals) => decimals,
        None => {
            warn!(token = %token.get_symbol(), "token decimals missing from catalog, assuming 18");
            18
        }
    }
}

/// Pick a spend amount in smallest units, or `None` when the balance cannot
/// support the policy minimum. `None` is an expected outcome on drained
/// wallets, not an error.
pub fn choose_amount(balance: U256, decimals: u8, policy: &AmountPolicy) -> Option<U256> {
    choose_amount_with_rng(&mut rand::thread_rng(), balance, decimals, policy)
}

pub fn choose_amount_with_rng<R: Rng>(rng: &mut R, balance: U256, decimals: u8, policy: &AmountPolicy) -> Option<U256> {
    if balance.is_zero() {
        return None;
    }

    let balance_f = Token::to_float(balance, decimals);
    let upper = policy.max.min(balance_f * policy.percent_of_balance_cap);
    if upper < policy.min {
        return None;
    }

    let mut amount = if upper > policy.min { rng.gen_range(policy.min..=upper) } else { policy.min };

    if !policy.precision_steps.is_empty() {
        let step = policy.precision_steps[rng.gen_range(0..policy.precision_steps.len())];
        let scale = 10f64.powi(step as i32);
        amount = (amount * scale).floor() / scale;
    }
    if amount < policy.min {
        // flooring can undershoot the minimum; round the minimum up instead
        amount = policy.min;
    }

    let units = Token::from_float(amount, decimals);
    if units.is_zero() {
        return None;
    }
    Some(units.min(balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn policy() -> AmountPolicy {
        AmountPolicy { min: 0.01, max: 1.0, percent_of_balance_cap: 0.5, precision_steps: vec![1, 2, 3] }
    }

    fn ether(value: f64) -> U256 {
        Token::from_float(value, 18)
    }

    #[test]
    fn test_amount_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let balance = ether(10.0);
        for _ in 0..1000 {
            let units = choose_amount_with_rng(&mut rng, balance, 18, &policy()).unwrap();
            let amount = Token::to_float(units, 18);
            assert!(amount >= 0.01 - 1e-12, "below minimum: {amount}");
            assert!(amount <= 1.0 + 1e-12, "above maximum: {amount}");
            assert!(units <= balance);
        }
    }

    #[test]
    fn test_percent_cap_binds_before_max() {
        let mut rng = StdRng::seed_from_u64(7);
        // balance 1.0, cap 50% -> upper bound 0.5 despite max 1.0
        for _ in 0..500 {
            let units = choose_amount_with_rng(&mut rng, ether(1.0), 18, &policy()).unwrap();
            assert!(Token::to_float(units, 18) <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_insufficient_balance_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        // cap * balance below the minimum
        assert_eq!(choose_amount_with_rng(&mut rng, ether(0.01), 18, &policy()), None);
        assert_eq!(choose_amount_with_rng(&mut rng, U256::ZERO, 18, &policy()), None);
    }

    #[test]
    fn test_precision_flooring_never_rounds_up() {
        let mut rng = StdRng::seed_from_u64(42);
        let tight = AmountPolicy { min: 0.1, max: 0.999, percent_of_balance_cap: 1.0, precision_steps: vec![1] };
        for _ in 0..200 {
            let units = choose_amount_with_rng(&mut rng, ether(100.0), 18, &tight).unwrap();
            let amount = Token::to_float(units, 18);
            // one decimal place after flooring
            let scaled = amount * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9, "not floored to step: {amount}");
        }
    }

    #[test]
    fn test_six_decimal_token() {
        let mut rng = StdRng::seed_from_u64(3);
        let balance = U256::from(50_000_000u64); // 50.0 at 6 decimals
        let units = choose_amount_with_rng(&mut rng, balance, 6, &policy()).unwrap();
        assert!(units >= U256::from(10_000u64));
        assert!(units <= balance);
    }

    #[test]
    fn test_resolve_decimals_fallback() {
        let with = Token::new_with_data(alloy_primitives::Address::repeat_byte(1), Some("USDC".into()), Some(6));
        let without = Token::new(alloy_primitives::Address::repeat_byte(2));
        assert_eq!(resolve_decimals(&with), 6);
        assert_eq!(resolve_decimals(&without), 18);
    }
}
