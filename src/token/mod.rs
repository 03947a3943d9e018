//! GhostToken - the brand scope for k2 structures
//!
//! A `GhostToken<'brand>` is a zero-sized capability handed out by
//! [`GhostToken::new`]. Every tree, view and edge iterator built against the
//! token carries its `'brand`, and iterator equality is only defined inside one
//! brand. Two trees built in different token scopes can never have their
//! iterators compared, even when their sentinels happen to coincide.
//!
//! ## Core invariant
//!
//! `GhostToken<'brand>` is intentionally **not** `Copy`/`Clone`, and the brand
//! is a fresh, invariant lifetime per call to `new`.

/// Invariant lifetime definitions for branding.
pub mod invariant;

pub use invariant::InvariantLifetime;

/// A zero-sized token that brands the k2 structures created in its scope.
#[derive(Debug)]
pub struct GhostToken<'brand>(InvariantLifetime<'brand>);

impl<'brand> GhostToken<'brand> {
    /// Creates a new token and executes a closure with it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use k2tree::{GhostToken, K2Tree};
    ///
    /// let count = GhostToken::new(|token| {
    ///     let tree = K2Tree::<2>::from_edges(&token, 4, &[(0, 1), (3, 0)]).unwrap();
    ///     tree.edges().count()
    /// });
    /// assert_eq!(count, 2);
    /// ```
    pub fn new<F, R>(f: F) -> R
    where
        F: for<'new_brand> FnOnce(GhostToken<'new_brand>) -> R,
    {
        f(GhostToken(InvariantLifetime::default()))
    }

    /// Returns the brand marker stored by structures created under this token.
    #[inline(always)]
    pub(crate) const fn brand(&self) -> InvariantLifetime<'brand> {
        InvariantLifetime::new()
    }
}

// Tokens carry no data, so sharing `&GhostToken<'brand>` across threads is sound.
// Concurrent readers of one tree only ever hold shared borrows of it.
