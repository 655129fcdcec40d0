use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Arithmetic backend used by every stage of shapelet selection.
///
/// Designed for static polymorphism: the kernel, quality score and selectors
/// are generic over `N: Numeric`, so the same algorithm is monomorphized for
/// floating-point or fixed-point arithmetic. Only the primitive operations and
/// the "infinite" sentinel differ between backends.
pub trait Numeric:
    Copy
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
{
    /// Additive identity.
    fn zero() -> Self;

    /// Sentinel returned by an abandoned distance computation.
    ///
    /// Must compare greater than or equal to every finite distance.
    fn infinity() -> Self;

    /// Square root. Negative inputs are not expected by the algorithms.
    fn sqrt(self) -> Self;

    /// Convert a count into the backend.
    fn from_usize(n: usize) -> Self;

    /// Convert a raw sample into the backend.
    fn from_f64(value: f64) -> Self;

    /// Convert back to `f64` for reporting.
    fn to_f64(self) -> f64;

    #[inline]
    fn square(self) -> Self {
        self * self
    }

    /// Whether this value is the early-abandon sentinel.
    #[inline]
    fn is_infinite(self) -> bool {
        self >= Self::infinity()
    }
}

macro_rules! impl_float_numeric {
    ($t:ty) => {
        impl Numeric for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn infinity() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn from_usize(n: usize) -> Self {
                n as $t
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_float_numeric!(f32);
impl_float_numeric!(f64);

/// Signed fixed-point number with 16 fractional bits stored in an `i64`.
///
/// Addition and subtraction saturate, multiplication and division go through
/// `i128` intermediates. `i64::MAX` doubles as the infinite sentinel, so a
/// saturated running sum is indistinguishable from an abandoned one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;
    pub const ONE: Fixed = Fixed(1 << Self::FRAC_BITS);
    pub const MAX: Fixed = Fixed(i64::MAX);
    pub const MIN: Fixed = Fixed(i64::MIN);

    /// Build from the raw two's-complement representation.
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw two's-complement representation.
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    fn saturate(value: i128) -> i64 {
        value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

/// Integer square root (floor) via Newton iteration.
fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        let product = (self.0 as i128 * rhs.0 as i128) >> Self::FRAC_BITS;
        Fixed(Self::saturate(product))
    }
}

impl Div for Fixed {
    type Output = Fixed;

    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Fixed::MAX } else { Fixed::MIN };
        }
        let quotient = ((self.0 as i128) << Self::FRAC_BITS) / rhs.0 as i128;
        Fixed(Self::saturate(quotient))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl Numeric for Fixed {
    #[inline]
    fn zero() -> Self {
        Fixed(0)
    }

    #[inline]
    fn infinity() -> Self {
        Fixed::MAX
    }

    fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Fixed(0);
        }
        // sqrt(raw / 2^f) * 2^f == sqrt(raw * 2^f)
        let root = isqrt((self.0 as u128) << Self::FRAC_BITS);
        Fixed(root as i64)
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        Fixed(Self::saturate((n as i128) << Self::FRAC_BITS))
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        // `as` saturates on overflow and maps NaN to 0
        Fixed((value * (1u64 << Self::FRAC_BITS) as f64).round() as i64)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << Self::FRAC_BITS) as f64
    }
}
