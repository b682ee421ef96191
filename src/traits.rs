//! Numeric traits bounding the structural-index value type.

use core::{
    fmt::{Debug, Display},
    ops::{AddAssign, SubAssign},
};

use num_traits::{PrimInt, Signed};

/// Trait for signed integer types that can store structural indices
/// (derivative orders) and sums thereof.
///
/// The canonical choice is `i64`, which is the default value type of all
/// matrix and result types in this crate; smaller types work as long as they
/// can hold `dimension * maximum_order` without overflow.
pub trait SigmaValue: PrimInt + Signed + AddAssign + SubAssign + Debug + Display {}

impl<T: PrimInt + Signed + AddAssign + SubAssign + Debug + Display> SigmaValue for T {}
