use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;

use attex_core::error::AttexError;
use attex_core::types::{Hash32, OutputSpec};
use attex_crypto::keccak256;

// ── Recognised type set ──────────────────────────────────────────────────────

/// Whether a type tag is in the recognised EVM set: `address`, `bool`,
/// `string`, `bytes`, `bytes1..32`, `uintN`/`intN` for N a multiple of 8 up
/// to 256, and any of those with a single trailing `[]`. Fixed-size arrays
/// `T[N]` are not accepted.
pub fn recognised_type(tag: &str) -> bool {
    let base = match tag.strip_suffix("[]") {
        Some(inner) => inner,
        None => tag,
    };
    if base.ends_with(']') {
        return false;
    }
    match base {
        "address" | "bool" | "string" | "bytes" => true,
        _ => {
            if let Some(n) = base.strip_prefix("bytes") {
                matches!(n.parse::<u32>(), Ok(width) if (1..=32).contains(&width))
            } else if let Some(n) = base.strip_prefix("uint") {
                matches!(n.parse::<u32>(), Ok(bits) if bits % 8 == 0 && (8..=256).contains(&bits))
            } else if let Some(n) = base.strip_prefix("int") {
                matches!(n.parse::<u32>(), Ok(bits) if bits % 8 == 0 && (8..=256).contains(&bits))
            } else {
                false
            }
        }
    }
}

// ── Coercion ─────────────────────────────────────────────────────────────────

/// Coerce an output value's string form into a typed ABI value: decimal
/// strings for integer types, `true`/`false` for bool, 0x-hex for address
/// and byte types, strings as-is, `[…]` for dynamic arrays.
fn coerce(tag: &str, value: &str) -> Result<DynSolValue, AttexError> {
    let ty = DynSolType::parse(tag).map_err(|e| AttexError::Encoding {
        ty: tag.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })?;
    ty.coerce_str(value).map_err(|e| AttexError::Encoding {
        ty: tag.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

// ── Message encoding ─────────────────────────────────────────────────────────

/// Standard Solidity `abi.encode` of the tuple
/// `(bytes32 processorProviderHash, …values)` with the value types drawn
/// from the outputs list.
pub fn encode_outputs(
    pph: &Hash32,
    outputs: &[OutputSpec],
    values: &[String],
) -> Result<Vec<u8>, AttexError> {
    if outputs.len() != values.len() {
        return Err(AttexError::Encoding {
            ty: "tuple".to_string(),
            value: format!("{} values", values.len()),
            message: format!("outputs list has {} entries", outputs.len()),
        });
    }
    let mut tuple = Vec::with_capacity(values.len() + 1);
    tuple.push(DynSolValue::FixedBytes(B256::from(*pph.as_bytes()), 32));
    for (spec, value) in outputs.iter().zip(values) {
        tuple.push(coerce(&spec.type_tag, value)?);
    }
    Ok(DynSolValue::Tuple(tuple).abi_encode_params())
}

/// `keccak256(abi.encode(processorProviderHash, …values))`: the digest the
/// attestor signs and the contract reconstructs.
pub fn message_hash(
    pph: &Hash32,
    outputs: &[OutputSpec],
    values: &[String],
) -> Result<Hash32, AttexError> {
    Ok(Hash32::from_bytes(keccak256(&encode_outputs(
        pph, outputs, values,
    )?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, ty: &str) -> OutputSpec {
        OutputSpec {
            name: name.into(),
            type_tag: ty.into(),
        }
    }

    #[test]
    fn recognised_type_matrix() {
        for ok in [
            "address", "bool", "string", "bytes", "bytes1", "bytes32", "uint8", "uint256",
            "int8", "int256", "uint256[]", "address[]", "bytes32[]",
        ] {
            assert!(recognised_type(ok), "{ok} should be recognised");
        }
        for bad in [
            "uint", "int", "uint7", "uint264", "bytes0", "bytes33", "felt", "uint256[3]",
            "uint256[][]", "", "Address",
        ] {
            assert!(!recognised_type(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn static_tuple_encoding_shape() {
        let pph = Hash32::from_bytes([0x11; 32]);
        let encoded = encode_outputs(
            &pph,
            &[spec("amountInCents", "uint256")],
            &["100".to_string()],
        )
        .unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[..32], pph.as_bytes());
        assert_eq!(encoded[63], 100);
    }

    #[test]
    fn round_trips_through_abi_decode() {
        let pph = Hash32::from_bytes([0x22; 32]);
        let outputs = [
            spec("receiverId", "address"),
            spec("amountInCents", "uint256"),
            spec("note", "string"),
        ];
        let values = [
            "0xc70e00000000000000000000000000000000bfa0".to_string(),
            "100".to_string(),
            "venmo payment".to_string(),
        ];
        let encoded = encode_outputs(&pph, &outputs, &values).unwrap();

        let tuple_ty = DynSolType::Tuple(vec![
            DynSolType::FixedBytes(32),
            DynSolType::Address,
            DynSolType::Uint(256),
            DynSolType::String,
        ]);
        let decoded = tuple_ty.abi_decode_params(&encoded).unwrap();
        match decoded {
            DynSolValue::Tuple(items) => {
                assert_eq!(items.len(), 4);
                match &items[3] {
                    DynSolValue::String(s) => assert_eq!(s, "venmo payment"),
                    other => panic!("expected string, got {other:?}"),
                }
            }
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn any_value_byte_changes_the_hash() {
        let pph = Hash32::from_bytes([0x33; 32]);
        let outputs = [spec("amount", "uint256"), spec("ok", "bool")];
        let a = message_hash(&pph, &outputs, &["100".into(), "true".into()]).unwrap();
        let b = message_hash(&pph, &outputs, &["101".into(), "true".into()]).unwrap();
        let c = message_hash(&pph, &outputs, &["100".into(), "false".into()]).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn invalid_coercions_fail() {
        let pph = Hash32::from_bytes([0u8; 32]);
        // not a decimal
        assert!(message_hash(&pph, &[spec("x", "uint256")], &["1.5".into()]).is_err());
        // wrong address length
        assert!(message_hash(&pph, &[spec("x", "address")], &["0x1234".into()]).is_err());
        // wrong fixed-bytes width
        assert!(message_hash(&pph, &[spec("x", "bytes32")], &["0x11".into()]).is_err());
        // not a bool literal
        assert!(message_hash(&pph, &[spec("x", "bool")], &["yes".into()]).is_err());
        // negative into unsigned
        assert!(message_hash(&pph, &[spec("x", "uint256")], &["-1".into()]).is_err());
    }

    #[test]
    fn mismatched_lengths_fail() {
        let pph = Hash32::from_bytes([0u8; 32]);
        assert!(encode_outputs(&pph, &[spec("x", "uint256")], &[]).is_err());
    }
}
