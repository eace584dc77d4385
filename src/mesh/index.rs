//! Index types for pipeline elements.
//!
//! Sorted triangles and connectivity groups are both plain
//! array positions internally. These wrappers keep them from being mixed up
//! at API boundaries.

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A triangle index in sorted (processing) order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

/// A connectivity group. The raw value is the triangle id of the group's root.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GroupId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit below the sentinel.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(TriangleId, "T");
impl_index_type!(GroupId, "G");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_id() {
        let t = TriangleId::new(42);
        assert_eq!(t.index(), 42);
        assert!(t.is_valid());
        assert!(!TriangleId::invalid().is_valid());
        assert!(!TriangleId::default().is_valid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", TriangleId::new(7)), "T(7)");
        assert_eq!(format!("{:?}", GroupId::from(3)), "G(3)");
        assert_eq!(format!("{:?}", GroupId::invalid()), "G(INVALID)");
    }

    #[test]
    fn test_ordering() {
        assert!(GroupId::new(1) < GroupId::new(2));
    }
}
