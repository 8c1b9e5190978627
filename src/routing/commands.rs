use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;

/// Opcode bytes of the command-based router.
pub const OP_SWAP_EXACT_IN: u8 = 0x00;
pub const OP_WRAP_NATIVE: u8 = 0x0b;
pub const OP_UNWRAP_NATIVE: u8 = 0x0c;

/// Typed instruction for the command-based router. Programs are composed
/// and inspected as these values; the opcode byte string and the ABI blobs
/// exist only at the serialization boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum RouterCommand {
    WrapNative { amount: U256 },
    SwapExactIn { path: Vec<Address>, amount_in: U256, min_out: U256, recipient: Address },
    UnwrapNative { min_amount: U256, recipient: Address },
}

impl RouterCommand {
    pub fn opcode(&self) -> u8 {
        match self {
            RouterCommand::WrapNative { .. } => OP_WRAP_NATIVE,
            RouterCommand::SwapExactIn { .. } => OP_SWAP_EXACT_IN,
            RouterCommand::UnwrapNative { .. } => OP_UNWRAP_NATIVE,
        }
    }

    /// ABI parameter blob paired with this command's opcode.
    pub fn encode_input(&self) -> Bytes {
        match self {
            RouterCommand::WrapNative { amount } => (*amount,).abi_encode_params().into(),
            RouterCommand::SwapExactIn { path, amount_in, min_out, recipient } => {
                (*recipient, *amount_in, *min_out, path.clone()).abi_encode_params().into()
            }
            RouterCommand::UnwrapNative { min_amount, recipient } => (*recipient, *min_amount).abi_encode_params().into(),
        }
    }
}

/// Lower a program to the (opcodes, inputs) pair the router's `execute`
/// entrypoint takes. Order is preserved; one input blob per opcode byte.
pub fn lower_program(commands: &[RouterCommand]) -> (Bytes, Vec<Bytes>) {
    let opcodes: Vec<u8> = commands.iter().map(RouterCommand::opcode).collect();
    let inputs = commands.iter().map(RouterCommand::encode_input).collect();
    (opcodes.into(), inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_bytes() {
        let program = [
            RouterCommand::WrapNative { amount: U256::from(10) },
            RouterCommand::SwapExactIn {
                path: vec![Address::repeat_byte(1), Address::repeat_byte(2)],
                amount_in: U256::from(10),
                min_out: U256::from(2),
                recipient: Address::repeat_byte(9),
            },
            RouterCommand::UnwrapNative { min_amount: U256::from(2), recipient: Address::repeat_byte(9) },
        ];

        let (opcodes, inputs) = lower_program(&program);
        assert_eq!(opcodes.as_ref(), &[OP_WRAP_NATIVE, OP_SWAP_EXACT_IN, OP_UNWRAP_NATIVE]);
        assert_eq!(inputs.len(), 3);
        // wrap input is a single word
        assert_eq!(inputs[0].len(), 32);
        // swap input carries the dynamic path behind an offset
        assert!(inputs[1].len() > 4 * 32);
    }

    #[test]
    fn test_empty_program() {
        let (opcodes, inputs) = lower_program(&[]);
        assert!(opcodes.is_empty());
        assert!(inputs.is_empty());
    }
}
