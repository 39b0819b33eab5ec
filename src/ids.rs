//! Node identifier generation
//!
//! Ids are a base-36 millisecond timestamp followed by a random base-36
//! suffix. They are unique for the lifetime of a process with overwhelming
//! probability, but nothing guarantees uniqueness across restarts or machines.

use chrono::Utc;
use rand::Rng;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random characters appended after the timestamp (~56 bits of entropy)
const SUFFIX_LEN: usize = 11;

/// Generate a fresh node id
pub fn next_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut id = to_base36(millis);

    let mut rng = rand::thread_rng();
    id.extend((0..SUFFIX_LEN).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char));
    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return String::from("0");
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}
