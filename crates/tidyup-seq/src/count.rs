//! Permissive element counts for `take` and `drop`.
//!
//! Counts are never rejected: negative and NaN values clamp to zero,
//! fractional values round down, and values too large for `usize` saturate.

/// A numeric value usable as an element count.
pub trait IntoCount {
    fn into_count(self) -> usize;
}

impl IntoCount for usize {
    fn into_count(self) -> usize {
        self
    }
}

macro_rules! widening_count {
    ($($ty:ty),*) => {
        $(
            impl IntoCount for $ty {
                fn into_count(self) -> usize {
                    usize::from(self)
                }
            }
        )*
    };
}

macro_rules! unsigned_count {
    ($($ty:ty),*) => {
        $(
            impl IntoCount for $ty {
                fn into_count(self) -> usize {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }
            }
        )*
    };
}

macro_rules! signed_count {
    ($($ty:ty),*) => {
        $(
            impl IntoCount for $ty {
                fn into_count(self) -> usize {
                    usize::try_from(self).unwrap_or(if self < 0 { 0 } else { usize::MAX })
                }
            }
        )*
    };
}

macro_rules! float_count {
    ($($ty:ty),*) => {
        $(
            impl IntoCount for $ty {
                fn into_count(self) -> usize {
                    if self.is_nan() || self <= 0.0 {
                        0
                    } else {
                        // `as` saturates at usize::MAX
                        self.floor() as usize
                    }
                }
            }
        )*
    };
}

widening_count!(u8, u16);
unsigned_count!(u32, u64, u128);
signed_count!(i8, i16, i32, i64, i128, isize);
float_count!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(3usize.into_count(), 3);
        assert_eq!(7u64.into_count(), 7);
        assert_eq!(2i32.into_count(), 2);
        assert_eq!((-4i64).into_count(), 0);
        assert_eq!(i128::MAX.into_count(), usize::MAX);
    }

    #[test]
    fn floats() {
        assert_eq!(2.9f64.into_count(), 2);
        assert_eq!(0.5f32.into_count(), 0);
        assert_eq!((-1.5f64).into_count(), 0);
        assert_eq!(f64::NAN.into_count(), 0);
        assert_eq!(f64::INFINITY.into_count(), usize::MAX);
    }
}
