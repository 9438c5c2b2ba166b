//! Element-at-a-time reading of a top-level JSON array.
//!
//! CAM captures are single JSON arrays that can run to gigabytes.  Instead of
//! deserializing the whole array, a `serde` visitor pulls one element at a
//! time out of the `SeqAccess` and hands it to a callback as an untyped
//! [`serde_json::Value`].  Only the current element is ever in memory.
//!
//! Elements arrive as `Value` rather than a typed record so a single bad
//! record can be reported and skipped by the caller; a typed `next_element`
//! would abort the whole array on the first schema mismatch.

use std::fmt;
use std::io::Read;

use serde::Deserializer as _;
use serde::de::{SeqAccess, Visitor};
use serde_json::Value;

use crate::IngestResult;

struct ArrayVisitor<F> {
    on_element: F,
}

impl<'de, F> Visitor<'de> for ArrayVisitor<F>
where
    F: FnMut(usize, Value),
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of telemetry records")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut count = 0;
        while let Some(element) = seq.next_element::<Value>()? {
            (self.on_element)(count, element);
            count += 1;
        }
        Ok(count)
    }
}

/// Call `on_element(index, value)` for every element of the JSON array in
/// `reader`, in document order.  Returns the number of elements.
///
/// Wrap files in a `BufReader`; `serde_json` reads byte by byte.
///
/// # Errors
///
/// [`IngestError::Json`](crate::IngestError::Json) if the input is not valid
/// JSON, its top level is not an array, or anything but whitespace follows
/// the array.
pub fn for_each_array_element<R, F>(reader: R, on_element: F) -> IngestResult<usize>
where
    R: Read,
    F: FnMut(usize, Value),
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    let count = (&mut de).deserialize_seq(ArrayVisitor { on_element })?;
    de.end()?;
    Ok(count)
}
