//! Binary operator semantics
//!
//! Operands arrive already evaluated, left then right. `And`/`Or` therefore
//! never short-circuit.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use crate::ast::BinaryOp;

/// Apply a binary operator to two evaluated operands
pub fn apply_binary(op: BinaryOp, left: Value, right: Value) -> InterpResult<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(&left, &right, |a, b| Ok(a.wrapping_sub(b))),
        BinaryOp::Mul => arithmetic(&left, &right, |a, b| Ok(a.wrapping_mul(b))),
        BinaryOp::Div => arithmetic(&left, &right, floor_div),
        BinaryOp::Rem => arithmetic(&left, &right, floor_rem),

        BinaryOp::Eq => equals(&left, &right).map(Value::Bool),
        BinaryOp::Neq => equals(&left, &right).map(|eq| Value::Bool(!eq)),

        BinaryOp::Lt => compare(&left, &right, |a, b| a < b),
        BinaryOp::Gt => compare(&left, &right, |a, b| a > b),
        BinaryOp::Lte => compare(&left, &right, |a, b| a <= b),
        BinaryOp::Gte => compare(&left, &right, |a, b| a >= b),

        BinaryOp::And => logical(&left, &right, |a, b| a && b),
        BinaryOp::Or => logical(&left, &right, |a, b| a || b),
    }
}

/// Numeric sum, or concatenation of display forms when either side is a string
fn add(left: Value, right: Value) -> InterpResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        _ => {
            let mut text = concat_operand(&left)?;
            text.push_str(&concat_operand(&right)?);
            Ok(Value::str(text))
        }
    }
}

fn concat_operand(value: &Value) -> InterpResult<String> {
    match value {
        Value::Int(n) => Ok(n.to_string()),
        Value::Str(s) => Ok(s.to_string()),
        _ => Err(RuntimeError::type_mismatch("number or string")),
    }
}

fn arithmetic<F>(left: &Value, right: &Value, f: F) -> InterpResult<Value>
where
    F: FnOnce(i64, i64) -> InterpResult<i64>,
{
    match (left.as_int(), right.as_int()) {
        (Some(a), Some(b)) => f(a, b).map(Value::Int),
        _ => Err(RuntimeError::type_mismatch("number")),
    }
}

fn compare<F>(left: &Value, right: &Value, f: F) -> InterpResult<Value>
where
    F: FnOnce(i64, i64) -> bool,
{
    match (left.as_int(), right.as_int()) {
        (Some(a), Some(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::type_mismatch("number")),
    }
}

fn logical<F>(left: &Value, right: &Value, f: F) -> InterpResult<Value>
where
    F: FnOnce(bool, bool) -> bool,
{
    match (left.as_bool(), right.as_bool()) {
        (Some(a), Some(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::type_mismatch("boolean")),
    }
}

/// Equality is only defined between two numbers, two strings or two booleans
fn equals(left: &Value, right: &Value) -> InterpResult<bool> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        _ => Err(RuntimeError::type_mismatch(
            "two numbers, two strings or two booleans",
        )),
    }
}

/// Quotient rounded toward negative infinity
pub fn floor_div(a: i64, b: i64) -> InterpResult<i64> {
    if b == 0 {
        return Err(RuntimeError::division_by_zero());
    }
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder matching `floor_div`: `a - b * floor_div(a, b)`, sign of `b`
pub fn floor_rem(a: i64, b: i64) -> InterpResult<i64> {
    if b == 0 {
        return Err(RuntimeError::division_by_zero());
    }
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}
