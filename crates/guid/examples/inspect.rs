//! Simple decoder to inspect GUIDs.
//!
//! Reads GUIDs from the arguments (or generates one) and prints each field.

use guid::Guid;

fn main() {
    let inputs: Vec<String> = std::env::args().skip(1).collect();
    let guids: Vec<Result<Guid, guid::ParseError>> = if inputs.is_empty() {
        vec![Ok(Guid::new())]
    } else {
        inputs.iter().map(|s| s.parse()).collect()
    };

    for (i, parsed) in guids.into_iter().enumerate() {
        let g = match parsed {
            Ok(g) => g,
            Err(err) => {
                println!("[{}] {}: {}", i, inputs[i], err);
                continue;
            }
        };

        let (b1, b2) = g.prefix_bytes();
        let (incr, decr) = g.counters();
        let millis = g.timestamp_millis();

        println!("[{}] {}", i, g);
        println!("  Prefix:      {}{}", b1 as char, b2 as char);
        println!("  Timestamp:   {} ms since epoch", millis);
        println!("  Fingerprint: {}", g.fingerprint());
        println!("  Counters:    {} / {}", incr, decr);
        println!("  Random:      {}", g.random());
        println!("  Slug:        {}", g.slug());
        println!("  Bytes:       {:02x?}", g.as_bytes());
    }
}
