//! The [`Semiring`] capability bundle that parameterizes SpGEMM (`§4.2`).

/// A commutative monoid used by [`crate::impls::DistMatrix::reduce`]: `fold`
/// must be associative and commutative with `identity` as its neutral
/// element, exactly like a [`Semiring::add`] but without a paired multiply.
pub trait Monoid {
    /// Value type being folded.
    type Value;

    /// The neutral element: `fold(identity(), x) == x` for all `x`.
    fn identity() -> Self::Value;

    /// Combines two values. Must be associative and commutative.
    fn fold(a: Self::Value, b: Self::Value) -> Self::Value;
}

/// Capability bundle for `C = A * B` under a user-defined algebra (`§4.2`).
///
/// Implementors must guarantee:
/// - `add` is commutative and associative with `id()` as neutral element.
/// - `multiply` need not be commutative, but the engine never assumes it is
///   (`§9`): it always evaluates `multiply(a, b)` with `a` drawn from the
///   left operand and `b` from the right operand, in that order.
///
/// Cells equal to `id()` may be produced during SpGEMM and are the caller's
/// responsibility to prune afterwards (`§4.2`).
pub trait Semiring {
    /// Value type stored in the left operand's cells.
    type Left;
    /// Value type stored in the right operand's cells.
    type Right;
    /// Value type stored in the product's cells.
    type Output;

    /// The additive identity: cells equal to this value carry no
    /// information and may be pruned.
    fn id() -> Self::Output;

    /// Commutative, associative accumulation of two partial products.
    fn add(a: Self::Output, b: Self::Output) -> Self::Output;

    /// Combines one cell of the left operand with one cell of the right
    /// operand that share the contracted index.
    fn multiply(a: &Self::Left, b: &Self::Right) -> Self::Output;
}
