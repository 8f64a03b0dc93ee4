#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use veneer_core::{Key, Value};
use veneer_registrar::{Depth, RegistrationConfig, Registrar};

#[derive(Arbitrary, Debug)]
enum FuzzValue {
    Null,
    Bool(bool),
    Number(i32),
    Text(u8),
    Object(Vec<(u8, FuzzValue)>),
    Sequence(Vec<FuzzValue>),
}

impl FuzzValue {
    fn to_value(&self, budget: &mut usize) -> Value {
        if *budget == 0 {
            return Value::Null;
        }
        *budget -= 1;
        match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::from(*b),
            FuzzValue::Number(n) => Value::from(*n),
            FuzzValue::Text(t) => Value::from(format!("t{t}")),
            FuzzValue::Object(entries) => {
                let entries: Vec<(String, Value)> = entries
                    .iter()
                    .map(|(k, v)| (key_name(*k), v.to_value(budget)))
                    .collect();
                Value::object(entries)
            }
            FuzzValue::Sequence(items) => {
                let items: Vec<Value> = items.iter().map(|v| v.to_value(budget)).collect();
                Value::sequence(items)
            }
        }
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Register(u8, FuzzValue),
    RegisterRecursive(u8, FuzzValue),
    Set(u8, FuzzValue),
    WriteBacking(u8, FuzzValue),
    Get(u8),
    Delete(u8),
}

fn key_name(k: u8) -> String {
    format!("k{}", k % 8)
}

fuzz_target!(|input: (Option<u8>, Vec<FuzzOp>)| {
    let (depth, ops) = input;
    let config = match depth {
        Some(levels) => RegistrationConfig::new().with_depth(Depth::Levels(u32::from(levels % 4))),
        None => RegistrationConfig::new().with_depth(Depth::Unbounded),
    };
    let Ok(registrar) = Registrar::with_config(config) else {
        return;
    };
    let mut budget = 512usize;
    for op in ops.iter().take(256) {
        match op {
            FuzzOp::Register(k, v) => {
                let _ = registrar.register(key_name(*k), v.to_value(&mut budget));
            }
            FuzzOp::RegisterRecursive(k, v) => {
                let _ = registrar.register_recursive(key_name(*k), v.to_value(&mut budget));
            }
            FuzzOp::Set(k, v) => registrar.set(key_name(*k), v.to_value(&mut budget)),
            FuzzOp::WriteBacking(k, v) => {
                registrar.backing().write(&Key::from(key_name(*k)), v.to_value(&mut budget));
            }
            FuzzOp::Get(k) => {
                let _ = registrar.get(key_name(*k));
            }
            FuzzOp::Delete(k) => {
                let _ = registrar.delete(key_name(*k));
            }
        }
    }
});
