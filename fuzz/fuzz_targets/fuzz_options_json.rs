#![no_main]

use cascader_core::{FieldKeys, parse_options, resolve};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Arbitrary JSON must either load as an option array or fail cleanly.
    let Ok(options) = parse_options(text) else {
        return;
    };

    let keys = FieldKeys::default();
    for raw in options.iter().take(16) {
        let Some(target) = keys.value_of(raw) else {
            continue;
        };
        let res = resolve(&options, Some(target), &keys);
        assert!(res.is_found(), "root value not found: {target}");
        assert_eq!(res.columns.len(), res.active_path.len());
        assert_eq!(res.matched().and_then(|n| n.value()), Some(target));
    }
});
