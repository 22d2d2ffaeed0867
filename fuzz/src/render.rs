#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
#[serde(untagged)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    String(String),
    List(Vec<Value>),
}

fuzz_target!(|data: (&str, BTreeMap<String, Value>, Vec<&str>, u8)| {
    let (source, ctx, recursive, depth) = data;
    let mut bindings = match condfmt::Bindings::from_serialize(&ctx) {
        Ok(bindings) => bindings,
        Err(_) => return,
    };
    for name in recursive {
        bindings.insert_recursive(name);
    }
    let mut engine = condfmt::Engine::new();
    engine.set_max_recursion_depth(usize::from(depth % 8));
    let _ = engine.format(source, &bindings);
});
