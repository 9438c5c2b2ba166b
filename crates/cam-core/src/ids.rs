//! Strongly typed identifier wrappers.
//!
//! Integer ids are `Copy + Ord + Hash` so they can be used as map keys and
//! sorted collection elements without ceremony.  [`RoadId`] is the one
//! string-valued id: road datasets key their ways by text (`"way/4217"`), so
//! it wraps a shared `Arc<str>` and clones in O(1).

use std::fmt;
use std::sync::Arc;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// ITS station identifier from the CAM header (`stationID`, 0..=2³²−1).
    pub struct StationId(u32);
}

typed_id! {
    /// Dense handle of a road segment inside the geometry store and the
    /// spatial index.  Assigned sequentially in load order.
    pub struct RoadHandle(u32);
}

// ── RoadId ────────────────────────────────────────────────────────────────────

/// Stable road identifier taken from the road dataset.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RoadId(Arc<str>);

impl RoadId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        RoadId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoadId {
    fn from(s: &str) -> Self {
        RoadId::new(s)
    }
}

impl From<String> for RoadId {
    fn from(s: String) -> Self {
        RoadId::new(s)
    }
}

impl std::borrow::Borrow<str> for RoadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
