use super::error::EntryError;
use rand::TryRngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

/// Generates a random (version 4) `MESSAGE_ID` from the OS CSPRNG.
pub fn generate() -> Result<String, EntryError> {
    generate_with(&mut OsRng)
}

/// Generates a `MESSAGE_ID` from the given random source.
///
/// The result is lowercase hex in `8-4-4-4-12` groups.
pub fn generate_with<R>(rng: &mut R) -> Result<String, EntryError>
where
    R: TryRngCore + ?Sized,
{
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| EntryError::IdGenerationFailed {
            reason: e.to_string(),
        })?;

    // version 4
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    // variant 10xx
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Ok(Uuid::from_bytes(bytes).hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io;

    struct Exhausted;

    impl TryRngCore for Exhausted {
        type Error = io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err(io::Error::other("entropy source unavailable"))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err(io::Error::other("entropy source unavailable"))
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err(io::Error::other("entropy source unavailable"))
        }
    }

    #[test]
    fn test_layout_is_random_based_uuid() {
        let id = generate().unwrap();

        assert_eq!(id.len(), 36);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn test_same_seed_same_id() {
        let a = generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[14..15], "4");
    }

    #[test]
    fn test_unavailable_randomness_is_reported() {
        let err = generate_with(&mut Exhausted).unwrap_err();
        assert!(matches!(err, EntryError::IdGenerationFailed { .. }));
        assert!(err.to_string().contains("entropy source unavailable"));
    }
}
