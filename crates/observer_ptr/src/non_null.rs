use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr::NonNull;

/// A read-only `NonNull<T>`.
///
/// This is the address type stored by [`ObserverPtr`](crate::ObserverPtr).
/// Unlike `NonNull<T>`, it never hands out `*mut T` or `&mut T`, so an
/// observer of `T` created from a shared reference cannot be turned into a
/// writable one by accident.
///
/// Equality, ordering and hashing only look at the data address, metadata of
/// wide pointers is ignored.
///
/// # Examples
///
/// ```
/// use observer_ptr::ConstNonNull;
///
/// let x = 10;
///
/// let ptr = ConstNonNull::from_ref(&x);
///
/// assert_eq!(unsafe{ *ptr.as_ref() }, 10);
/// ```
#[repr(transparent)]
pub struct ConstNonNull<T: ?Sized>(NonNull<T>);

impl<T: ?Sized> ConstNonNull<T> {
    /// Create a new `ConstNonNull` or return `None` if `ptr` is null.
    ///
    /// # Examples
    ///
    /// ```
    /// use observer_ptr::ConstNonNull;
    ///
    /// let x = 0u32;
    /// let ptr = ConstNonNull::new(&raw const x).expect("ptr is null!");
    ///
    /// assert!(ConstNonNull::new(core::ptr::null::<u32>()).is_none());
    /// ```
    #[inline]
    pub const fn new(ptr: *const T) -> Option<Self> {
        match NonNull::new(ptr.cast_mut()) {
            Some(x) => Some(Self(x)),
            None => None,
        }
    }

    /// Create a new `ConstNonNull` without checking for null.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null.
    #[inline(always)]
    pub const unsafe fn new_unchecked(ptr: *const T) -> Self {
        unsafe { Self(NonNull::new_unchecked(ptr.cast_mut())) }
    }

    /// Return an immutable reference to the value.
    ///
    /// # Safety
    ///
    /// When calling this method, you have to ensure that the pointer is
    /// [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion).
    #[inline(always)]
    pub const unsafe fn as_ref<'a>(&self) -> &'a T {
        // Safety: See `NonNull::as_ref`
        unsafe { self.0.as_ref() }
    }

    /// Acquires the underlying `*const` pointer.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    /// The data address with metadata stripped.
    ///
    /// Two `ConstNonNull` are equal iff their thin addresses are equal.
    #[inline(always)]
    pub const fn thin(&self) -> *const () {
        self.0.as_ptr().cast_const().cast::<()>()
    }

    /// Drops the write permission of a `NonNull<T>`.
    ///
    /// [`From::from`] is not const, but this is.
    #[inline(always)]
    pub const fn from_non_null(ptr: NonNull<T>) -> Self {
        Self(ptr)
    }

    /// Converts a reference to a `ConstNonNull` pointer.
    #[inline(always)]
    pub const fn from_ref(r: &T) -> Self {
        Self(NonNull::from_ref(r))
    }

    /// Converts a mutable reference to a `ConstNonNull` pointer.
    ///
    /// The write permission of `r` is dropped.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self(NonNull::from_mut(r))
    }
}

impl<T: ?Sized> From<NonNull<T>> for ConstNonNull<T> {
    #[inline(always)]
    fn from(value: NonNull<T>) -> Self {
        Self(value)
    }
}

impl<'a, T: ?Sized> From<&'a T> for ConstNonNull<T> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::from_ref(value)
    }
}

impl<T: ?Sized> From<ConstNonNull<T>> for *const T {
    #[inline(always)]
    fn from(value: ConstNonNull<T>) -> Self {
        value.as_ptr()
    }
}

impl<T: ?Sized> Clone for ConstNonNull<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ConstNonNull<T> {}

impl<T: ?Sized> PartialEq for ConstNonNull<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.thin() == other.thin()
    }
}

impl<T: ?Sized> Eq for ConstNonNull<T> {}

impl<T: ?Sized> PartialOrd for ConstNonNull<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for ConstNonNull<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.thin().cmp(&other.thin())
    }
}

impl<T: ?Sized> Hash for ConstNonNull<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.thin().hash(state);
    }
}

impl<T: ?Sized> fmt::Pointer for ConstNonNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T: ?Sized> fmt::Debug for ConstNonNull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}
