//! Fuzz target for textual `dist_shape` values such as `"[2, 23.4]"`.

#![no_main]

use ldar_config::ShapeSpec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: String| {
    let _ = ShapeSpec::Text(text).normalize();
});
