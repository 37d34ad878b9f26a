//! Tier trait for representing API rate limit constraints.

/// Rate limiting constraints for an API tier.
///
/// All methods return `Option<T>` where `None` indicates unlimited.
///
/// # Example
///
/// ```
/// use overthink_rate_limit::Tier;
///
/// struct FreeTier;
///
/// impl Tier for FreeTier {
///     fn rpm(&self) -> Option<u32> { Some(15) }
///     fn rpd(&self) -> Option<u32> { Some(1500) }
///     fn max_concurrent(&self) -> Option<u32> { Some(4) }
///     fn name(&self) -> &str { "Free" }
/// }
///
/// assert_eq!(FreeTier.rpm(), Some(15));
/// ```
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Requests per day limit.
    fn rpd(&self) -> Option<u32>;

    /// Maximum concurrent requests.
    fn max_concurrent(&self) -> Option<u32>;

    /// Name of the tier (e.g., "Free", "Pay-as-you-go").
    fn name(&self) -> &str;
}
