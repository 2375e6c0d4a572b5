//! Shared address and value pools for the generators.
//!
//! All helpers draw from the caller's RNG so that seeded generators stay
//! reproducible. Threat addresses come from documentation-reserved ranges
//! (RFC 5737) so synthesized attack data can never point at a real host.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Documentation-reserved prefixes used for synthesized attacker traffic.
pub const THREAT_RANGES: &[&str] = &["203.0.113.", "198.51.100.", "192.0.2."];

/// Internal network prefixes for destination/target addresses.
pub const INTERNAL_SUBNETS: &[&str] = &["10.0.0.", "10.1.0.", "192.168.1.", "172.16.0."];

/// A plausible public IPv4 address: skips loopback, RFC 1918, link-local
/// and multicast space.
pub fn public_ip(rng: &mut StdRng) -> String {
    loop {
        let a: u8 = rng.random_range(1..=223);
        let b: u8 = rng.random_range(0..=255);
        let reserved = a == 10
            || a == 127
            || (a == 172 && (16..=31).contains(&b))
            || (a == 192 && b == 168)
            || (a == 169 && b == 254)
            || (a == 100 && (64..=127).contains(&b));
        if reserved {
            continue;
        }
        return format!(
            "{a}.{b}.{}.{}",
            rng.random_range(0..=255u8),
            rng.random_range(1..=254u8)
        );
    }
}

/// A private RFC 1918 address.
pub fn private_ip(rng: &mut StdRng) -> String {
    format!(
        "10.{}.{}.{}",
        rng.random_range(0..=255u8),
        rng.random_range(0..=255u8),
        rng.random_range(1..=254u8)
    )
}

/// An address inside one of the curated internal subnets.
pub fn internal_ip(rng: &mut StdRng) -> String {
    let subnet = INTERNAL_SUBNETS.choose(rng).unwrap();
    format!("{subnet}{}", rng.random_range(1..=254u8))
}

/// An address from the documentation-reserved threat ranges.
pub fn threat_ip(rng: &mut StdRng) -> String {
    let prefix = THREAT_RANGES.choose(rng).unwrap();
    format!("{prefix}{}", rng.random_range(1..=254u8))
}

/// A source port from the ephemeral range.
pub fn ephemeral_port(rng: &mut StdRng) -> u16 {
    rng.random_range(49152..=65535)
}

/// A lowercase hex string, used for key fingerprints in messages.
pub fn hex_token(rng: &mut StdRng, len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    (0..len)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}
