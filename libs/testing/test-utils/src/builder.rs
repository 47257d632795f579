use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Deterministic test-data builder.
///
/// Seeded from the test name so every name and id it hands out is stable
/// across runs but unique across tests.
#[derive(Debug, Clone)]
pub struct TestDataBuilder {
    seed: u64,
    test_name: String,
}

impl TestDataBuilder {
    /// Create a builder seeded from the calling test's name
    pub fn from_test_name(test_name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        test_name.hash(&mut hasher);
        Self {
            seed: hasher.finish(),
            test_name: test_name.to_string(),
        }
    }

    /// Stable name of the form `<kind>-<label>-<hash>`
    pub fn name(&self, kind: &str, label: &str) -> String {
        format!("{}-{}-{:08x}", kind, label, self.fold(label))
    }

    /// Stable resource id of the form `<label>-<hash>`
    pub fn resource_id(&self, label: &str) -> String {
        format!("{}-{:08x}", label, self.fold(label))
    }

    /// Stable UUID derived from the seed and label
    pub fn uuid(&self, label: &str) -> Uuid {
        let folded = self.fold(label);
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_be_bytes());
        bytes[8..].copy_from_slice(&folded.to_be_bytes());
        Uuid::from_bytes(bytes)
    }

    /// The test name this builder was seeded from
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    fn fold(&self, label: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        label.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_deterministic() {
        let a = TestDataBuilder::from_test_name("some_test");
        let b = TestDataBuilder::from_test_name("some_test");

        assert_eq!(a.name("resource", "vm"), b.name("resource", "vm"));
        assert_eq!(a.resource_id("vm"), b.resource_id("vm"));
        assert_eq!(a.uuid("vm"), b.uuid("vm"));
    }

    #[test]
    fn test_builders_for_different_tests_differ() {
        let a = TestDataBuilder::from_test_name("test_one");
        let b = TestDataBuilder::from_test_name("test_two");

        assert_ne!(a.resource_id("vm"), b.resource_id("vm"));
        assert_ne!(a.uuid("vm"), b.uuid("vm"));
    }

    #[test]
    fn test_labels_differ_within_one_builder() {
        let builder = TestDataBuilder::from_test_name("labels");
        assert_ne!(builder.resource_id("vm"), builder.resource_id("db"));
    }
}
