//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;
use uuid::Uuid;

/// Alphabet used for course codes (uppercase letters and digits).
const COURSE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated course codes.
pub const COURSE_CODE_LEN: usize = 6;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a random token id (jti claim).
    #[must_use]
    pub fn generate_jti(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Generate a random 6-character alphanumeric course code.
    ///
    /// Uniqueness is not guaranteed here; the caller retries on a
    /// unique-constraint conflict from the store.
    #[must_use]
    pub fn generate_course_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..COURSE_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..COURSE_CODE_ALPHABET.len());
                char::from(COURSE_CODE_ALPHABET[idx])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_jti() {
        let id_gen = IdGenerator::new();
        let jti = id_gen.generate_jti();

        assert_eq!(jti.len(), 32); // Simple UUID without hyphens
    }

    #[test]
    fn test_generate_course_code_format() {
        let id_gen = IdGenerator::new();

        for _ in 0..100 {
            let code = id_gen.generate_course_code();
            assert_eq!(code.len(), COURSE_CODE_LEN);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_course_code_varies() {
        let id_gen = IdGenerator::new();
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| id_gen.generate_course_code()).collect();

        // 36^6 keyspace; 50 draws colliding entirely would be astonishing
        assert!(codes.len() > 1);
    }
}
