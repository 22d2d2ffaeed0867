#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let result = condfmt::format(&condfmt::escape(data), &condfmt::Bindings::new()).unwrap();
    assert_eq!(result, data);
});
