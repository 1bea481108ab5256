//! Integer range helpers.

/// Returns true when `value` is representable as `T` without truncation.
///
/// Used when narrowing varints read off the wire, e.g. a property key that
/// must fit in `u16` or a count that must fit in `u32`.
#[inline]
pub fn fits_in<T>(value: i64) -> bool
where
    T: TryFrom<i64>,
{
    T::try_from(value).is_ok()
}
