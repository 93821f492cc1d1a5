//! Per-argument coercion of loosely-typed values to declared parameter types.
//!
//! The ladder, first applicable step wins:
//!
//! 1. exact match: the value's runtime type is the target type
//! 2. custom conversion: the target carries a converter, which alone decides
//! 3. integral-float collapse: `3.0` becomes `3` for integer targets
//! 4. general convertibility: same representation under another name,
//!    lossless numeric conversions, anything to `Value`
//! 5. failure
//!
//! Every value produced here conforms to its target descriptor.

use crate::runtime::{
    error::CuminError,
    types::{FloatKind, Kind, Signature, TypeDescriptor},
    value::Value,
};

/// Largest magnitude up to which every integer is exactly representable as
/// an `f64` (2^53).
const F64_EXACT_INT: i64 = 1 << 53;
/// Same bound for `f32` (2^24).
const F32_EXACT_INT: i64 = 1 << 24;

/// Coerces every argument to the matching parameter of `signature`.
///
/// Stops at the first argument that cannot be adapted. The caller guarantees
/// `args.len() == signature.arity()`.
pub fn coerce_all(args: &[Value], signature: &Signature) -> Result<Vec<Value>, CuminError> {
    args.iter()
        .zip(signature.params())
        .enumerate()
        .map(|(index, (value, target))| coerce(value, target, index, signature))
        .collect()
}

/// Adapts one value to `target`, or reports why it cannot.
pub fn coerce(
    value: &Value,
    target: &TypeDescriptor,
    index: usize,
    signature: &Signature,
) -> Result<Value, CuminError> {
    if value.descriptor() == *target {
        return Ok(value.clone());
    }

    if let Some(convert) = target.converter() {
        return match convert(value) {
            Ok(converted) if target.conforms(&converted) => {
                tracing::trace!(index, target = target.name(), "custom conversion");
                Ok(converted)
            }
            Ok(converted) => {
                tracing::debug!(
                    index,
                    target = target.name(),
                    produced = converted.type_name(),
                    "custom converter produced a non-conforming value"
                );
                Err(type_mismatch(value, target, index, signature))
            }
            Err(reason) => {
                tracing::debug!(
                    index,
                    target = target.name(),
                    %reason,
                    "custom converter rejected value"
                );
                Err(type_mismatch(value, target, index, signature))
            }
        };
    }

    if let Some(collapsed) = collapse_integral_float(value, target) {
        tracing::trace!(index, target = target.name(), "collapsed integral float");
        return Ok(collapsed);
    }

    if let Some(converted) = convert_native(value, target) {
        tracing::trace!(index, from = value.type_name(), target = target.name(), "converted");
        return Ok(converted);
    }

    Err(type_mismatch(value, target, index, signature))
}

fn type_mismatch(
    value: &Value,
    target: &TypeDescriptor,
    index: usize,
    signature: &Signature,
) -> CuminError {
    tracing::debug!(index, expected = target.name(), actual = value.type_name(), "type mismatch");
    CuminError::TypeMismatch {
        index,
        expected: target.name().to_string(),
        actual: value.type_name().to_string(),
        signature: signature.to_string(),
    }
}

/// `Float` with no fractional part to an integer target it fits in.
fn collapse_integral_float(value: &Value, target: &TypeDescriptor) -> Option<Value> {
    let (Value::Float(f), Kind::Int(int)) = (value, target.kind()) else {
        return None;
    };
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    // Saturates for huge magnitudes, which the range check then rejects.
    let wide = *f as i128;
    let (min, max) = int.range();
    if wide < i128::from(min) || wide > i128::from(max) {
        return None;
    }
    i64::try_from(wide).ok().map(Value::Int)
}

/// Conversions that cannot lose information, plus anything into `Value`.
///
/// A value that already has the target's representation converts as is, so
/// named types over a shared representation (`Meters` over `f64`) accept it.
fn convert_native(value: &Value, target: &TypeDescriptor) -> Option<Value> {
    match (value, target.kind()) {
        (_, Kind::Dynamic) => Some(value.clone()),
        _ if target.conforms(value) => Some(value.clone()),
        (Value::Int(v), Kind::Float(FloatKind::F64))
            if v.unsigned_abs() <= F64_EXACT_INT as u64 =>
        {
            Some(Value::Float(*v as f64))
        }
        (Value::Int(v), Kind::Float(FloatKind::F32))
            if v.unsigned_abs() <= F32_EXACT_INT as u64 =>
        {
            Some(Value::Float(*v as f64))
        }
        _ => None,
    }
}
