use core::cmp::Ordering;
use core::fmt::Debug;

// `deny(unreachable_pub)` would otherwise reject the seal.
#[allow(unreachable_pub)]
mod private {
    pub trait Sealed {}
}

/// A numeric key usable in an [`AvlTree`](crate::AvlTree).
///
/// Implemented for every primitive integer and floating-point type. Keys are compared with
/// a total order: the natural order for integers, and [`f64::total_cmp`] for floats, so
/// every float (including `NaN`) is a valid key and `-0.0` sorts before `+0.0`.
///
/// The trait is sealed; it cannot be implemented outside this crate.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use osavl_tree::Key;
///
/// assert_eq!(3u8.cmp_key(&7), Ordering::Less);
/// assert_eq!(f64::NAN.cmp_key(&f64::INFINITY), Ordering::Greater);
/// ```
pub trait Key: Copy + Debug + private::Sealed {
    /// Compares two keys under the tree's total order.
    fn cmp_key(&self, other: &Self) -> Ordering;
}

macro_rules! impl_integer_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl private::Sealed for $t {}

            impl Key for $t {
                #[inline]
                fn cmp_key(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }
            }
        )*
    };
}

macro_rules! impl_float_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl private::Sealed for $t {}

            impl Key for $t {
                #[inline]
                fn cmp_key(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_key!(f32, f64);
