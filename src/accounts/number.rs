//! Account number generation.

use chrono::Utc;
use rand::Rng;

/// Generates 10-digit account numbers: the last six digits of the current
/// UNIX timestamp followed by four random digits (1000..=9999).
#[derive(Debug, Default, Clone)]
pub struct AccountNumberGenerator;

impl AccountNumberGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now().timestamp())
    }

    /// Generate using an explicit timestamp.
    pub fn generate_at(&self, unix_secs: i64) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
        format!("{:06}{suffix}", unix_secs.rem_euclid(1_000_000))
    }
}
