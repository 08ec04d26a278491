//! Fuzz target for program file parsing and validation.
//!
//! Program files are user-edited YAML; parsing and validation must return
//! errors, never panic.

#![no_main]

use ldar_config::{validate_program, Program};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(program) = Program::from_yaml_str(text) {
            let _ = validate_program(&program);
            for cfg in program.subtypes.values() {
                if let Some(shape) = &cfg.dist_shape {
                    let _ = shape.normalize();
                }
            }
        }
    }
    let _ = serde_json::from_slice::<Program>(data);
});
