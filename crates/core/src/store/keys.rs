//! Push key generation
//!
//! Children appended to a list (queue, history) are keyed so that
//! lexicographic order matches creation order: a 48-bit millisecond
//! timestamp encoded in 8 characters, followed by 12 random characters.
//! Within one millisecond the random part is incremented instead of
//! redrawn, so keys generated back-to-back still sort in call order.

use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;

// Ordered so that character order matches numeric order
const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const RANDOM_LEN: usize = 12;

static LAST: Mutex<(u64, [u8; RANDOM_LEN])> = Mutex::new((0, [0; RANDOM_LEN]));

/// Generate a chronologically ordered child key
pub fn push_key() -> String {
    let now = Utc::now().timestamp_millis() as u64;
    let mut last = LAST.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if now > last.0 {
        last.0 = now;
        let mut rng = rand::thread_rng();
        for slot in last.1.iter_mut() {
            *slot = rng.gen_range(0..64);
        }
    } else {
        // Same millisecond (or a clock step backwards): bump the suffix
        for i in (0..RANDOM_LEN).rev() {
            if last.1[i] < 63 {
                last.1[i] += 1;
                break;
            }
            last.1[i] = 0;
        }
    }

    let mut key = encode_timestamp(last.0);
    for &index in last.1.iter() {
        key.push(ALPHABET[index as usize] as char);
    }
    key
}

/// 48-bit millisecond timestamp as 8 characters, high digit first
fn encode_timestamp(millis: u64) -> String {
    let mut out = String::with_capacity(8 + RANDOM_LEN);
    for position in (0..8).rev() {
        let index = ((millis >> (position * 6)) & 0x3f) as usize;
        out.push(ALPHABET[index] as char);
    }
    out
}
