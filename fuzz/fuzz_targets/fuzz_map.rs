#![no_main]

use libfuzzer_sys::fuzz_target;
use planetwars::game::{check_invariants, parse_map};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Any text either loads or is rejected; it must never panic
    let Ok(world) = parse_map(text) else {
        return;
    };

    // A world that loads is always consistent
    let violations = check_invariants(&world);
    assert!(violations.is_empty(), "Invariants violated after load: {violations:?}");
    assert_eq!(world.turn, 0);
});
