//! Node identity resolution.
//!
//! Identifiers embed a platform fragment and a process id so that
//! independent generators rarely collide. Both facts are resolved once per
//! process and cached for its lifetime:
//!
//! - the platform fragment comes from an explicit override
//!   (`ARKIV_MACHINE_ID`), else the best hardware address found on a real
//!   network interface, else random bytes;
//! - the process id comes from an explicit override (`ARKIV_PROCESS_ID`),
//!   else the OS process id truncated to 22 bits.
//!
//! Resolution never fails. Every discovery problem degrades to randomness
//! with a warning, because a weaker identity is better than refusing to
//! start.

use std::net::IpAddr;
use std::sync::OnceLock;

use rand::RngCore;
use sysinfo::Networks;
use tracing::{debug, warn};

use crate::identifier::PROCESS_ID_MAX;

/// Environment override for the platform fragment (MAC-like hex string).
pub const MACHINE_ID_ENV: &str = "ARKIV_MACHINE_ID";

/// Environment override for the process id.
pub const PROCESS_ID_ENV: &str = "ARKIV_PROCESS_ID";

/// Interface name prefixes treated as virtual and skipped during
/// hardware-address discovery.
const VIRTUAL_INTERFACE_PREFIXES: &[&str] = &[
    "lo", "docker", "veth", "br-", "virbr", "tun", "tap", "wg", "vmnet", "zt", "tailscale",
    "dummy",
];

/// The process-wide (platform fragment, process id) pair.
///
/// Obtain the shared instance with [`NodeIdentity::resolve`]; tests that
/// need a deterministic identity construct one with
/// [`NodeIdentity::from_parts`] and hand it to the factory explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIdentity {
    platform_fragment: [u8; 4],
    process_id: u32,
}

impl NodeIdentity {
    /// Resolves the identity of this process, computing it on first use
    /// and caching it for the process lifetime.
    pub fn resolve() -> &'static NodeIdentity {
        static NODE: OnceLock<NodeIdentity> = OnceLock::new();
        NODE.get_or_init(|| {
            let machine_id = std::env::var(MACHINE_ID_ENV).ok();
            let process_id = std::env::var(PROCESS_ID_ENV)
                .ok()
                .and_then(|value| value.parse::<u32>().ok());
            NodeIdentity::from_overrides(machine_id.as_deref(), process_id)
        })
    }

    /// Resolves an identity with explicit overrides taking precedence over
    /// discovery.
    pub fn from_overrides(machine_id: Option<&str>, process_id: Option<u32>) -> Self {
        NodeIdentity {
            platform_fragment: resolve_platform_fragment(machine_id),
            process_id: resolve_process_id(process_id),
        }
    }

    /// Builds an identity from fixed parts; the top bit of the fragment is
    /// cleared and the process id truncated to 22 bits.
    #[must_use]
    pub const fn from_parts(mut platform_fragment: [u8; 4], process_id: u32) -> Self {
        platform_fragment[0] &= 0x7f;
        NodeIdentity {
            platform_fragment,
            process_id: process_id & PROCESS_ID_MAX,
        }
    }

    /// The 4-byte platform fragment; its top bit is always clear.
    #[must_use]
    pub const fn platform_fragment(&self) -> [u8; 4] {
        self.platform_fragment
    }

    /// The fragment folded into the 31-bit platform id carried by
    /// identifiers.
    #[must_use]
    pub const fn platform_id(&self) -> u32 {
        u32::from_be_bytes(self.platform_fragment)
    }

    /// The 22-bit generating-process id.
    #[must_use]
    pub const fn process_id(&self) -> u32 {
        self.process_id
    }
}

// ============================================================================
// Platform fragment
// ============================================================================

fn resolve_platform_fragment(machine_id: Option<&str>) -> [u8; 4] {
    if let Some(text) = machine_id {
        match parse_machine_id(text) {
            Some(mut fragment) => {
                fragment[0] &= 0x7f;
                return fragment;
            }
            None => {
                warn!(machine_id = text, "machine id override does not look like a hardware address, falling back to discovery");
            }
        }
    }

    let mut fragment = match best_hardware_address() {
        Some(address) => {
            debug!(address = ?address, "platform fragment taken from hardware address");
            // The rightmost four bytes carry the locally-varying part.
            [address[2], address[3], address[4], address[5]]
        }
        None => {
            warn!("no usable hardware address found, using a random platform fragment");
            let mut random = [0u8; 4];
            rand::rng().fill_bytes(&mut random);
            random
        }
    };
    fragment[0] &= 0x7f;
    fragment
}

/// Parses a MAC-like override: 4 to 8 hex octet pairs, `:` or `-`
/// separators allowed anywhere. The rightmost four octets become the
/// fragment.
fn parse_machine_id(text: &str) -> Option<[u8; 4]> {
    let digits: String = text.chars().filter(|c| *c != ':' && *c != '-').collect();
    if digits.len() % 2 != 0 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let octets = digits.len() / 2;
    if !(4..=8).contains(&octets) {
        return None;
    }

    let tail = &digits[digits.len() - 8..];
    let mut fragment = [0u8; 4];
    for (index, chunk) in tail.as_bytes().chunks_exact(2).enumerate() {
        let pair = std::str::from_utf8(chunk).ok()?;
        fragment[index] = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(fragment)
}

/// Picks the best hardware address among real network interfaces.
///
/// An address is a candidate only if it is not all zeros and ones and not
/// multicast. Globally-unique addresses beat locally-administered ones;
/// remaining ties go to the interface with the better-scoped IP address.
fn best_hardware_address() -> Option<[u8; 6]> {
    let networks = Networks::new_with_refreshed_list();
    let mut best: Option<([u8; 6], u8)> = None;

    for (name, data) in &networks {
        if is_virtual_interface(name) {
            continue;
        }
        let address = data.mac_address().0;
        if !is_candidate_address(&address) {
            continue;
        }
        let ip_score = data
            .ip_networks()
            .iter()
            .map(|network| score_ip(&network.addr))
            .max()
            .unwrap_or(0);

        let better = match &best {
            None => true,
            Some((current, current_score)) => {
                match (is_globally_unique(current), is_globally_unique(&address)) {
                    (false, true) => true,
                    (true, false) => false,
                    _ => ip_score > *current_score,
                }
            }
        };
        if better {
            best = Some((address, ip_score));
        }
    }
    best.map(|(address, _)| address)
}

fn is_virtual_interface(name: &str) -> bool {
    VIRTUAL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

fn is_candidate_address(address: &[u8; 6]) -> bool {
    // All-zero and all-one-ish addresses are placeholders, and bit 0 of
    // the first byte marks multicast.
    let placeholder = address.iter().all(|byte| *byte == 0 || *byte == 1);
    !placeholder && address[0] & 0x01 == 0
}

fn is_globally_unique(address: &[u8; 6]) -> bool {
    // Bit 1 of the first byte set means locally administered.
    address[0] & 0x02 == 0
}

/// Ranks an interface address: site-local beats link-local beats multicast
/// beats loopback or unspecified.
fn score_ip(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(v4) => {
            if v4.is_unspecified() || v4.is_loopback() {
                0
            } else if v4.is_multicast() {
                1
            } else if v4.is_link_local() {
                2
            } else if v4.is_private() {
                3
            } else {
                4
            }
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            if v6.is_unspecified() || v6.is_loopback() {
                0
            } else if v6.is_multicast() {
                1
            } else if first & 0xffc0 == 0xfe80 {
                2
            } else if first & 0xfe00 == 0xfc00 {
                3
            } else {
                4
            }
        }
    }
}

// ============================================================================
// Process id
// ============================================================================

fn resolve_process_id(override_value: Option<u32>) -> u32 {
    if let Some(value) = override_value {
        if value <= PROCESS_ID_MAX {
            return value;
        }
        warn!(
            value,
            max = PROCESS_ID_MAX,
            "process id override out of range, falling back to the OS process id"
        );
    }
    std::process::id() & PROCESS_ID_MAX
}

// ============================================================================
// Tests
// ============================================================================
