//! The vector walkthrough, arithmetic and truthiness through slots.

use dunder_rt::walkthrough::{vector, vector_type};
use dunder_rt::{BinaryOp, Runtime, UnaryOp, Value};

pub fn run(rt: &Runtime) -> anyhow::Result<()> {
    let class = vector_type();

    let v1 = vector(rt, &class, Value::Int(2), Value::Int(4))?;
    let v2 = vector(rt, &class, Value::Int(2), Value::Int(1))?;
    let zero = rt.call(&Value::Type(class), &[])?;

    println!("v1 = {}", rt.repr(&v1)?);
    println!("v2 = {}", rt.repr(&v2)?);
    println!("v1 + v2 = {}", rt.repr(&rt.binary_op(BinaryOp::Add, &v1, &v2)?)?);
    println!("abs(v1) = {}", rt.repr(&rt.unary_op(UnaryOp::Abs, &v1)?)?);
    println!("bool(v1) = {}", rt.truth(&v1)?);
    println!("bool(Vector()) = {}", rt.truth(&zero)?);
    println!("v2 * 8 = {}", rt.repr(&rt.binary_op(BinaryOp::Mul, &v2, &Value::Int(8))?)?);

    match rt.binary_op(BinaryOp::Mul, &Value::Int(8), &v2) {
        Ok(product) => println!("8 * v2 = {}", rt.repr(&product)?),
        Err(failure) => println!("8 * v2 -> {}", failure),
    }

    Ok(())
}
