#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let engine = condfmt::Engine::new();
    if let Err(err) = engine.compile(data) {
        let _ = format!("{err:#}");
        let _ = err.line_col();
    }
});
