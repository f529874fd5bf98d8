pub mod random;

pub use random::RandomGenerator;

use burrow_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
///
/// Implementations can vary from simple random generators to
/// sequence-based or distributed ID generators.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a short code.
    ///
    /// Uniqueness is not guaranteed; callers storing the code must handle
    /// collisions with codes already in use.
    fn generate(&self) -> Self::Output;
}
