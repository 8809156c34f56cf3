//! License key generation.
//!
//! Keys look like `PRO-LQ2Z8K1C-4F7XK2M9QA1ZB`: a plan prefix, the issuance
//! time in base36 milliseconds, and 13 random base36 characters, uppercased.

use chrono::{DateTime, Utc};
use keyforge_control::Plan;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of random characters in a key.
pub const RANDOM_LEN: usize = 13;

/// Source of candidate license keys.
pub trait KeyGenerator: Send + Sync {
    /// Produce a candidate key for `plan`. Uniqueness is not guaranteed.
    fn generate(&self, plan: Plan, issued_at: DateTime<Utc>) -> String;
}

/// Default generator backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, plan: Plan, issued_at: DateTime<Utc>) -> String {
        let millis = u64::try_from(issued_at.timestamp_millis()).unwrap_or(0);

        let mut rng = rand::rng();
        let random: String = (0..RANDOM_LEN)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();

        format!("{}-{}-{}", key_prefix(plan), to_base36(millis), random)
    }
}

/// Key prefix for a plan tier.
pub fn key_prefix(plan: Plan) -> &'static str {
    match plan {
        Plan::Free => "FREE",
        Plan::Pro => "PRO",
        Plan::Premium => "PREM",
    }
}

/// Uppercase base36 rendering of `n`.
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_key_shape() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let key = RandomKeyGenerator.generate(Plan::Pro, at);

        let parts: Vec<&str> = key.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PRO");
        assert_eq!(parts[1], "LOYW3V28");
        assert_eq!(parts[2].len(), RANDOM_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_prefixes() {
        let now = Utc::now();
        assert!(RandomKeyGenerator.generate(Plan::Free, now).starts_with("FREE-"));
        assert!(RandomKeyGenerator.generate(Plan::Pro, now).starts_with("PRO-"));
        assert!(RandomKeyGenerator.generate(Plan::Premium, now).starts_with("PREM-"));
    }

    #[test]
    fn test_same_millisecond_keys_differ() {
        let now = Utc::now();
        let keys: HashSet<String> = (0..1000)
            .map(|_| RandomKeyGenerator.generate(Plan::Free, now))
            .collect();
        assert_eq!(keys.len(), 1000);
    }
}
