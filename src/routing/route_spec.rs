use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Slots in the padded on-chain route array: tokens and pools interleaved,
/// so five hops occupy all eleven slots.
pub const ROUTE_CAPACITY: usize = 11;
/// Rows in the per-hop parameter matrix, one row per hop.
pub const HOP_ROWS: usize = 5;
/// Columns per hop row: direction flag, fee in bps, pool kind tag.
pub const HOP_COLS: usize = 3;

pub const MAX_HOPS: usize = HOP_ROWS;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("route needs at least one hop")]
    Empty,
    #[error("route has {0} hops, capacity is {MAX_HOPS}")]
    TooManyHops(usize),
    #[error("expected {expected} tokens for {hops} hops, got {got}")]
    TokenCountMismatch { expected: usize, hops: usize, got: usize },
    #[error("zero address in route position {0}")]
    ZeroAddress(usize),
}

/// One hop through a pool. The direction flag is part of the hop, which is
/// why a reverse route must be derived rather than the arrays flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hop {
    pub pool: Address,
    /// 0 = token0 -> token1, 1 = token1 -> token0.
    pub direction: u8,
    pub fee_bps: u16,
    pub pool_kind: u8,
}

impl Hop {
    pub fn new(pool: Address, direction: u8) -> Self {
        Self { pool, direction, fee_bps: 30, pool_kind: 0 }
    }

    pub fn flipped(&self) -> Self {
        Self { direction: 1 - (self.direction & 1), ..*self }
    }
}

/// Wire-shaped multi-hop route for the padded pool router. Construction
/// validates hop/token arity and right-pads both the address array and the
/// parameter matrix with the zero sentinel the router expects.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSpec {
    tokens: Vec<Address>,
    hops: Vec<Hop>,
}

impl RouteSpec {
    /// `tokens` holds hop endpoints in order, so `tokens.len() == hops.len() + 1`.
    pub fn new(tokens: Vec<Address>, hops: Vec<Hop>) -> Result<Self, RouteError> {
        if hops.is_empty() {
            return Err(RouteError::Empty);
        }
        if hops.len() > MAX_HOPS {
            return Err(RouteError::TooManyHops(hops.len()));
        }
        if tokens.len() != hops.len() + 1 {
            return Err(RouteError::TokenCountMismatch { expected: hops.len() + 1, hops: hops.len(), got: tokens.len() });
        }
        for (i, token) in tokens.iter().enumerate() {
            if token.is_zero() {
                return Err(RouteError::ZeroAddress(i * 2));
            }
        }
        for (i, hop) in hops.iter().enumerate() {
            if hop.pool.is_zero() {
                return Err(RouteError::ZeroAddress(i * 2 + 1));
            }
        }
        Ok(Self { tokens, hops })
    }

    pub fn single_hop(token_in: Address, pool: Address, token_out: Address, direction: u8) -> Result<Self, RouteError> {
        Self::new(vec![token_in, token_out], vec![Hop::new(pool, direction)])
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn input_token(&self) -> Address {
        self.tokens[0]
    }

    pub fn output_token(&self) -> Address {
        self.tokens[self.tokens.len() - 1]
    }

    /// Opposite direction as a freshly derived route: endpoints reversed,
    /// hop order reversed, every direction flag flipped.
    pub fn derive_reverse(&self) -> Result<Self, RouteError> {
        let tokens = self.tokens.iter().rev().copied().collect();
        let hops = self.hops.iter().rev().map(Hop::flipped).collect();
        Self::new(tokens, hops)
    }

    /// Padded 11-slot address array: token/pool interleaved, zero tail.
    pub fn route_array(&self) -> [Address; ROUTE_CAPACITY] {
        let mut route = [Address::ZERO; ROUTE_CAPACITY];
        for (i, token) in self.tokens.iter().enumerate() {
            route[i * 2] = *token;
        }
        for (i, hop) in self.hops.iter().enumerate() {
            route[i * 2 + 1] = hop.pool;
        }
        route
    }

    /// Padded parameter matrix, one row per hop, all-zero rows as tail.
    pub fn param_matrix(&self) -> [[U256; HOP_COLS]; HOP_ROWS] {
        let mut matrix = [[U256::ZERO; HOP_COLS]; HOP_ROWS];
        for (i, hop) in self.hops.iter().enumerate() {
            matrix[i] = [U256::from(hop.direction), U256::from(hop.fee_bps), U256::from(hop.pool_kind)];
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_three_hop_padding() {
        let route = RouteSpec::new(
            vec![addr(1), addr(3), addr(5), addr(7)],
            vec![Hop::new(addr(2), 0), Hop::new(addr(4), 1), Hop::new(addr(6), 0)],
        )
        .unwrap();

        let array = route.route_array();
        assert_eq!(array.len(), ROUTE_CAPACITY);
        assert_eq!(array[0], addr(1));
        assert_eq!(array[1], addr(2));
        assert_eq!(array[6], addr(7));
        // tail is the zero sentinel
        assert!(array[7..].iter().all(|a| a.is_zero()));

        let matrix = route.param_matrix();
        assert_eq!(matrix[1][0], U256::from(1));
        assert_eq!(matrix[0][1], U256::from(30));
        assert!(matrix[3].iter().all(|v| v.is_zero()));
        assert!(matrix[4].iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_arity_validation() {
        assert_eq!(RouteSpec::new(vec![addr(1)], vec![]), Err(RouteError::Empty));
        let err = RouteSpec::new(vec![addr(1), addr(2), addr(3)], vec![Hop::new(addr(9), 0)]);
        assert!(matches!(err, Err(RouteError::TokenCountMismatch { .. })));

        let too_many: Vec<Hop> = (0..6).map(|i| Hop::new(addr(10 + i), 0)).collect();
        let tokens: Vec<Address> = (0..7).map(|i| addr(20 + i)).collect();
        assert_eq!(RouteSpec::new(tokens, too_many), Err(RouteError::TooManyHops(6)));
    }

    #[test]
    fn test_zero_address_rejected() {
        let err = RouteSpec::single_hop(Address::ZERO, addr(2), addr(3), 0);
        assert_eq!(err, Err(RouteError::ZeroAddress(0)));
    }

    #[test]
    fn test_reverse_is_derived_not_flipped() {
        let forward = RouteSpec::new(vec![addr(1), addr(3), addr(5)], vec![Hop::new(addr(2), 0), Hop::new(addr(4), 0)]).unwrap();
        let reverse = forward.derive_reverse().unwrap();

        assert_eq!(reverse.input_token(), forward.output_token());
        assert_eq!(reverse.output_token(), forward.input_token());
        // every hop direction flag flipped, so the wire arrays differ from a
        // plain reversal of the forward arrays
        let matrix = reverse.param_matrix();
        assert_eq!(matrix[0][0], U256::from(1));
        assert_eq!(matrix[1][0], U256::from(1));
        assert_eq!(reverse.route_array()[1], addr(4));
    }
}
