use crate::routing::commands::{RouterCommand, lower_program};
use crate::routing::route_spec::RouteSpec;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};

// Serialization boundary: every byte that leaves the crate for a contract
// is produced here. Signatures mirror the deployed testnet routers.
sol! {
    function approve(address spender, uint256 amount) external returns (bool);
    function deposit() external payable;

    function mixSwap(
        address fromToken,
        address toToken,
        uint256 fromTokenAmount,
        uint256 expReturnAmount,
        uint256 minReturnAmount,
        address[] mixAdapters,
        address[] mixPairs,
        address[] assetTo,
        uint256 directions,
        bytes[] moreInfos,
        bytes feeData,
        uint256 deadLine
    ) external payable returns (uint256);

    function multiPathSwap(
        uint256 amountIn,
        uint256 minAmountOut,
        address[11] route,
        uint256[3][5] hopParams,
        address to,
        uint256 deadline
    ) external payable returns (uint256);

    function execute(bytes commands, bytes[] inputs, uint256 deadline) external payable;

    function swapExactNativeForTokens(
        uint256 amountOutMin,
        address[] path,
        address to,
        uint256 deadline
    ) external payable returns (uint256[] amounts);

    function swapExactTokensForTokens(
        uint256 amountIn,
        uint256 amountOutMin,
        address[] path,
        address to,
        uint256 deadline
    ) external returns (uint256[] amounts);
}

pub fn encode_approve(spender: Address, amount: U256) -> Bytes {
    approveCall { spender, amount }.abi_encode().into()
}

pub fn encode_wrap_native() -> Bytes {
    depositCall {}.abi_encode().into()
}

/// Single-hop swap through the AMM adapter router. The adapter and pair
/// arrive as one-element arrays; `asset_to` routes funds pair -> recipient.
#[allow(clippy::too_many_arguments)]
pub fn encode_amm_adapter_swap(
    from_token: Address,
    to_token: Address,
    amount_in: U256,
    expected_out: U256,
    min_out: U256,
    adapter: Address,
    pair: Address,
    recipient: Address,
    direction: U256,
    deadline: U256,
) -> Bytes {
    mixSwapCall {
        fromToken: from_token,
        toToken: to_token,
        fromTokenAmount: amount_in,
        expReturnAmount: expected_out,
        minReturnAmount: min_out,
        mixAdapters: vec![adapter],
        mixPairs: vec![pair],
        assetTo: vec![pair, recipient],
        directions: direction,
        moreInfos: vec![Bytes::new()],
        feeData: Bytes::new(),
        deadLine: deadline,
    }
    .abi_encode()
    .into()
}

pub fn encode_padded_pool_swap(route: &RouteSpec, amount_in: U256, min_out: U256, to: Address, deadline: U256) -> Bytes {
    multiPathSwapCall {
        amountIn: amount_in,
        minAmountOut: min_out,
        route: route.route_array(),
        hopParams: route.param_matrix(),
        to,
        deadline,
    }
    .abi_encode()
    .into()
}

pub fn encode_universal_program(program: &[RouterCommand], deadline: U256) -> Bytes {
    let (commands, inputs) = lower_program(program);
    executeCall { commands, inputs, deadline }.abi_encode().into()
}

pub fn encode_path_swap_native_in(min_out: U256, path: Vec<Address>, to: Address, deadline: U256) -> Bytes {
    swapExactNativeForTokensCall { amountOutMin: min_out, path, to, deadline }.abi_encode().into()
}

pub fn encode_path_swap_token_in(amount_in: U256, min_out: U256, path: Vec<Address>, to: Address, deadline: U256) -> Bytes {
    swapExactTokensForTokensCall { amountIn: amount_in, amountOutMin: min_out, path, to, deadline }.abi_encode().into()
}

/// Raw selector + pre-encoded parameter blob, for contracts called without
/// a published ABI (lending pool, subscription manager).
pub fn encode_with_selector(selector: [u8; 4], params: &[u8]) -> Bytes {
    let mut data = Vec::with_capacity(4 + params.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(params);
    data.into()
}
