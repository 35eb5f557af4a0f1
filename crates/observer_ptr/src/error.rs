use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Misuse of an observer detected at runtime.
///
/// The only runtime check is the one on dereference, every other operation
/// is total.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DerefError {
    #[error("Dereferenced an absent observer of `{0}`")]
    Absent(&'static str),
}

impl DerefError {
    #[inline]
    pub(crate) fn absent<T: ?Sized>() -> Self {
        DerefError::Absent(core::any::type_name::<T>())
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle_error(&self) -> ! {
        log::error!("{self}");
        panic!("{self}");
    }
}

#[cfg(test)]
mod tests {
    use super::DerefError;
    use alloc::string::ToString;

    #[test]
    fn names_the_element_type() {
        let err = DerefError::absent::<u32>();
        assert_eq!(err, DerefError::Absent("u32"));
        assert_eq!(err.to_string(), "Dereferenced an absent observer of `u32`");
    }

    #[test]
    #[should_panic(expected = "absent observer of `i64`")]
    fn handle_error_panics() {
        DerefError::absent::<i64>().handle_error();
    }
}
