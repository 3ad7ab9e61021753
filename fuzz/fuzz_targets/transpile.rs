#![no_main]

use libfuzzer_sys::fuzz_target;
use polyglot::Transpiler;
use polyglot::backend::ALL_BACKENDS;
use polyglot::cli::commands::AstBundle;

fuzz_target!(|data: &[u8]| {
    // Only well-formed bundles reach the printer; malformed trees must fail with an error, never a panic.
    if let Ok(bundle) = serde_json::from_slice::<AstBundle>(data) {
        for &id in ALL_BACKENDS {
            let _ = Transpiler::new(id).transpile(&bundle.ast, &bundle.types);
        }
    }
});
