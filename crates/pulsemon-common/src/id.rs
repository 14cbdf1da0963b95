use snowflake::SnowflakeIdBucket;

/// Snowflake ID generator for alert records.
///
/// Owned by whoever stamps IDs (one per monitor instance); there is no
/// process-global generator, so independently configured monitors in the same
/// process never contend on shared state.
pub struct IdGenerator {
    bucket: SnowflakeIdBucket,
}

impl IdGenerator {
    /// `machine_id` and `node_id` each range over 0-31.
    pub fn new(machine_id: i32, node_id: i32) -> Self {
        Self {
            bucket: SnowflakeIdBucket::new(machine_id, node_id),
        }
    }

    /// Generate the next ID as a decimal string.
    pub fn next_id(&mut self) -> String {
        self.bucket.get_id().to_string()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let mut ids = IdGenerator::default();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!(!id.is_empty());
            assert!(seen.insert(id), "duplicate ID generated");
        }
    }

    #[test]
    fn generated_ids_are_numeric() {
        let mut ids = IdGenerator::new(2, 3);
        let id = ids.next_id();
        assert!(id.parse::<i64>().is_ok(), "ID should be a valid i64: {id}");
    }
}
