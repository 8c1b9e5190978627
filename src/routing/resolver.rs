use crate::constants::{FallbackContract, NATIVE, ROUTER_NATIVE_PLACEHOLDER, WRAPPED_NATIVE};
use crate::error::OpError;
use crate::registry::NetworkDescriptor;
use crate::routing::commands::RouterCommand;
use crate::routing::encoder;
use crate::routing::families::RouterFamily;
use crate::routing::route_spec::{Hop, RouteSpec};
use alloy_primitives::{Address, Bytes, U256};

/// What the swap engine wants done, independent of any router protocol.
/// `NATIVE` (the zero address) marks the native coin on either side.
#[derive(Clone, Debug)]
pub struct SwapIntent {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub recipient: Address,
    /// Pool/pair backing the input token, when its catalog entry names one.
    pub pool_in: Option<Address>,
    /// Pool/pair backing the output token.
    pub pool_out: Option<Address>,
}

impl SwapIntent {
    fn native_in(&self) -> bool {
        self.token_in == NATIVE
    }

    fn native_out(&self) -> bool {
        self.token_out == NATIVE
    }
}

/// One fully-encoded attempt: target, calldata, attached value, and the
/// spender an allowance must cover (None when the input is native). The
/// label keys the engine's visited set.
#[derive(Clone, Debug)]
pub struct SwapPlan {
    pub label: String,
    pub family: RouterFamily,
    pub target: Address,
    pub calldata: Bytes,
    pub value: U256,
    pub spender: Option<Address>,
}

/// Coarse expectation bounds. Testnet pools quote unreliably, so the
/// submitted minimum is a deliberately loose floor.
fn quote_bounds(amount_in: U256) -> (U256, U256) {
    (amount_in >> 1, amount_in >> 2)
}

/// Binds the swap intent to the router family of one network and produces
/// the ordered attempt list the engine walks. Bound once per network; an
/// unknown chain id leaves it uninitialized and every resolve fails fast.
#[derive(Clone, Debug)]
pub struct RouteResolver {
    network: String,
    family: Option<RouterFamily>,
    router: Address,
    adapter: Address,
    wrapped_native: Address,
    fallback_router: Address,
}

impl RouteResolver {
    pub fn for_network(network: &NetworkDescriptor) -> Self {
        let family = RouterFamily::for_chain(network.chain_id);
        let router = match family {
            Some(RouterFamily::AmmAdapter) => network.contract_or("amm_adapter_router", FallbackContract::AMM_ADAPTER_ROUTER),
            Some(RouterFamily::PaddedPool) => network.contract_or("padded_pool_router", FallbackContract::PADDED_POOL_ROUTER),
            // the command router has no canonical fallback deployment
            Some(RouterFamily::Universal) => network.contract_or("universal_router", Address::ZERO),
            Some(RouterFamily::MinimalPath) => network.contract_or("minimal_path_router", FallbackContract::MINIMAL_PATH_ROUTER),
            None => Address::ZERO,
        };
        Self {
            network: network.name.clone(),
            family,
            router,
            adapter: network.contract_or("mix_adapter", FallbackContract::AMM_MIX_ADAPTER),
            wrapped_native: network.contract_or("wrapped_native", WRAPPED_NATIVE),
            fallback_router: network.contract_or("fallback_router", FallbackContract::MINIMAL_PATH_ROUTER),
        }
    }

    pub fn family(&self) -> Option<RouterFamily> {
        self.family
    }

    fn unsupported(&self, what: impl Into<String>) -> OpError {
        OpError::Unsupported { network: self.network.clone(), what: what.into() }
    }

    /// Token-to-token path for the path-driven routers. Pools on the target
    /// chains only pair against wrapped native, so the route hops through it
    /// unless one endpoint already is the wrapped coin.
    fn token_pair_path(&self, token_in: Address, token_out: Address) -> Vec<Address> {
        if token_in == self.wrapped_native || token_out == self.wrapped_native {
            vec![token_in, token_out]
        } else {
            vec![token_in, self.wrapped_native, token_out]
        }
    }

    /// Ordered attempt plans for `intent`, primary first. Labels are unique
    /// so the engine's visited set can cap retries.
    pub fn resolve(&self, intent: &SwapIntent, deadline: U256) -> Result<Vec<SwapPlan>, OpError> {
        let family = self.family.ok_or_else(|| self.unsupported("no router family bound for this chain"))?;
        match family {
            RouterFamily::AmmAdapter => self.resolve_amm_adapter(intent, deadline),
            RouterFamily::PaddedPool => self.resolve_padded_pool(intent, deadline),
            RouterFamily::Universal => self.resolve_universal(intent, deadline),
            RouterFamily::MinimalPath => self.resolve_minimal_path(intent, deadline),
        }
    }

    fn resolve_amm_adapter(&self, intent: &SwapIntent, deadline: U256) -> Result<Vec<SwapPlan>, OpError> {
        let pair = intent
            .pool_out
            .or(intent.pool_in)
            .ok_or_else(|| self.unsupported("no pair configured for the chosen tokens"))?;

        let from = if intent.native_in() { ROUTER_NATIVE_PLACEHOLDER } else { intent.token_in };
        let to = if intent.native_out() { ROUTER_NATIVE_PLACEHOLDER } else { intent.token_out };
        let (expected_out, min_out) = quote_bounds(intent.amount_in);
        let direction = if intent.native_in() { U256::ZERO } else { U256::from(1) };

        let calldata = encoder::encode_amm_adapter_swap(
            from,
            to,
            intent.amount_in,
            expected_out,
            min_out,
            self.adapter,
            pair,
            intent.recipient,
            direction,
            deadline,
        );

        Ok(vec![SwapPlan {
            label: "amm_adapter:mix".to_string(),
            family: RouterFamily::AmmAdapter,
            target: self.router,
            calldata,
            value: if intent.native_in() { intent.amount_in } else { U256::ZERO },
            spender: (!intent.native_in()).then_some(self.router),
        }])
    }

    fn resolve_padded_pool(&self, intent: &SwapIntent, deadline: U256) -> Result<Vec<SwapPlan>, OpError> {
        let from = if intent.native_in() { ROUTER_NATIVE_PLACEHOLDER } else { intent.token_in };
        let to = if intent.native_out() { ROUTER_NATIVE_PLACEHOLDER } else { intent.token_out };
        let (_, min_out) = quote_bounds(intent.amount_in);
        let value = if intent.native_in() { intent.amount_in } else { U256::ZERO };
        let spender = (!intent.native_in()).then_some(self.router);

        let direct_pool = intent
            .pool_out
            .or(intent.pool_in)
            .ok_or_else(|| self.unsupported("no pool configured for the chosen tokens"))?;
        let direct = RouteSpec::single_hop(from, direct_pool, to, 0).map_err(|e| OpError::Invariant(e.to_string()))?;

        let mut plans = vec![SwapPlan {
            label: "padded_pool:direct".to_string(),
            family: RouterFamily::PaddedPool,
            target: self.router,
            calldata: encoder::encode_padded_pool_swap(&direct, intent.amount_in, min_out, intent.recipient, deadline),
            value,
            spender,
        }];

        // Two-hop alternate through wrapped native, when both sides name a
        // pool and neither endpoint already is the wrapped coin.
        if let (Some(pool_in), Some(pool_out)) = (intent.pool_in, intent.pool_out) {
            if pool_in != pool_out && from != self.wrapped_native && to != self.wrapped_native {
                let via = RouteSpec::new(
                    vec![from, self.wrapped_native, to],
                    vec![Hop::new(pool_in, 1), Hop::new(pool_out, 0)],
                )
                .map_err(|e| OpError::Invariant(e.to_string()))?;
                plans.push(SwapPlan {
                    label: "padded_pool:via_wrapped".to_string(),
                    family: RouterFamily::PaddedPool,
                    target: self.router,
                    calldata: encoder::encode_padded_pool_swap(&via, intent.amount_in, min_out, intent.recipient, deadline),
                    value,
                    spender,
                });
            }
        }

        Ok(plans)
    }

    fn resolve_universal(&self, intent: &SwapIntent, deadline: U256) -> Result<Vec<SwapPlan>, OpError> {
        if self.router.is_zero() {
            return Err(self.unsupported("universal router address not configured"));
        }

        let (_, min_out) = quote_bounds(intent.amount_in);
        let value = if intent.native_in() { intent.amount_in } else { U256::ZERO };

        let program = if intent.native_in() {
            vec![
                RouterCommand::WrapNative { amount: intent.amount_in },
                RouterCommand::SwapExactIn {
                    path: vec![self.wrapped_native, intent.token_out],
                    amount_in: intent.amount_in,
                    min_out,
                    recipient: intent.recipient,
                },
            ]
        } else if intent.native_out() {
            vec![
                RouterCommand::SwapExactIn {
                    path: vec![intent.token_in, self.wrapped_native],
                    amount_in: intent.amount_in,
                    min_out,
                    // proceeds stay with the router until the unwrap step
                    recipient: self.router,
                },
                RouterCommand::UnwrapNative { min_amount: min_out, recipient: intent.recipient },
            ]
        } else {
            vec![RouterCommand::SwapExactIn {
                path: self.token_pair_path(intent.token_in, intent.token_out),
                amount_in: intent.amount_in,
                min_out,
                recipient: intent.recipient,
            }]
        };

        let primary = SwapPlan {
            label: "universal:program".to_string(),
            family: RouterFamily::Universal,
            target: self.router,
            calldata: encoder::encode_universal_program(&program, deadline),
            value,
            spender: (!intent.native_in()).then_some(self.router),
        };

        // Same intent re-expressed for the plain path router; used only when
        // the command router reverts.
        let fallback_path = if intent.native_in() {
            vec![self.wrapped_native, intent.token_out]
        } else if intent.native_out() {
            vec![intent.token_in, self.wrapped_native]
        } else {
            self.token_pair_path(intent.token_in, intent.token_out)
        };
        let fallback_calldata = if intent.native_in() {
            encoder::encode_path_swap_native_in(min_out, fallback_path, intent.recipient, deadline)
        } else {
            encoder::encode_path_swap_token_in(intent.amount_in, min_out, fallback_path, intent.recipient, deadline)
        };
        let fallback = SwapPlan {
            label: "minimal_path:fallback".to_string(),
            family: RouterFamily::MinimalPath,
            target: self.fallback_router,
            calldata: fallback_calldata,
            value,
            spender: (!intent.native_in()).then_some(self.fallback_router),
        };

        Ok(vec![primary, fallback])
    }

    fn resolve_minimal_path(&self, intent: &SwapIntent, deadline: U256) -> Result<Vec<SwapPlan>, OpError> {
        // Wrapping the native coin is its own deposit call on this chain,
        // not a router swap.
        if intent.native_in() && intent.token_out == self.wrapped_native {
            return Ok(vec![SwapPlan {
                label: "wrap:deposit".to_string(),
                family: RouterFamily::MinimalPath,
                target: self.wrapped_native,
                calldata: encoder::encode_wrap_native(),
                value: intent.amount_in,
                spender: None,
            }]);
        }

        let plan = if intent.native_in() {
            SwapPlan {
                label: "minimal_path:native_in".to_string(),
                family: RouterFamily::MinimalPath,
                target: self.router,
                // min-out zero mirrors how these routers are driven on the
                // target chain; the deadline still bounds the attempt
                calldata: encoder::encode_path_swap_native_in(
                    U256::ZERO,
                    vec![self.wrapped_native, intent.token_out],
                    intent.recipient,
                    deadline,
                ),
                value: intent.amount_in,
                spender: None,
            }
        } else {
            let out = if intent.native_out() { self.wrapped_native } else { intent.token_out };
            SwapPlan {
                label: "minimal_path:token_in".to_string(),
                family: RouterFamily::MinimalPath,
                target: self.router,
                calldata: encoder::encode_path_swap_token_in(
                    intent.amount_in,
                    U256::ZERO,
                    vec![intent.token_in, out],
                    intent.recipient,
                    deadline,
                ),
                value: U256::ZERO,
                spender: Some(self.router),
            }
        };

        Ok(vec![plan])
    }
}
