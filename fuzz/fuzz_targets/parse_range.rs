#![no_main]

use libfuzzer_sys::fuzz_target;
use sv_range::Comparator;

fuzz_target!(|data: &str| {
    if let Ok(chain) = Comparator::parse(data) {
        // Normalized rendering can be longer than the input (shorthands
        // expand to two bounds), so re-parsing may hit the length limit;
        // when it fits, it must reproduce the same chain.
        let rendered = chain.to_string();
        if let Ok(reparsed) = Comparator::parse(&rendered) {
            assert_eq!(chain, reparsed);
        }
    }
});
