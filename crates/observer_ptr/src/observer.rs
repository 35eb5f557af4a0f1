use core::fmt;
use core::hint::unreachable_unchecked;
use core::mem;
use core::ptr::{self, NonNull};

use crate::config::CONFIG;
use crate::error::DerefError;
use crate::non_null::ConstNonNull;

// -----------------------------------------------------------------------------
// Common methods

/// The failure path of `as_ref` and `as_mut`.
///
/// # Safety
/// Unreachable unless [`CONFIG.assert_on_null_dereference`](crate::ObserverConfig)
/// is on.
#[cold]
#[cfg_attr(debug_assertions, track_caller)]
unsafe fn absent_dereference<T: ?Sized>() -> ! {
    if CONFIG.assert_on_null_dereference {
        DerefError::absent::<T>().handle_error();
    }
    // SAFETY: the caller guarantees the observer is not absent.
    unsafe { unreachable_unchecked() }
}

macro_rules! impl_observer {
    ($observer:ident, $addr:ident, $raw:ty) => {
        impl<T: ?Sized> $observer<T> {
            /// Creates an absent observer.
            #[inline(always)]
            pub const fn null() -> Self {
                Self(None)
            }

            /// Returns the observed address, `None` if absent.
            #[inline(always)]
            pub const fn get(&self) -> Option<$addr<T>> {
                self.0
            }

            /// Returns `true` if an address is observed.
            #[inline(always)]
            pub const fn is_observing(&self) -> bool {
                self.0.is_some()
            }

            /// Returns `true` if absent.
            #[inline(always)]
            pub const fn is_null(&self) -> bool {
                self.0.is_none()
            }

            /// Stops observing and returns the previously observed address.
            ///
            /// Nothing is freed, the pointee is untouched.
            #[inline]
            pub const fn release(&mut self) -> Option<$addr<T>> {
                self.0.take()
            }

            /// Stops observing. The previous address is discarded.
            #[inline]
            pub const fn reset(&mut self) {
                self.0 = None;
            }

            /// Observes `ptr` instead. A null `ptr` leaves the observer absent.
            #[inline]
            pub const fn reset_to(&mut self, ptr: $raw) {
                *self = Self::new(ptr);
            }

            /// Exchanges the observed addresses of `self` and `other`.
            #[inline]
            pub const fn swap(&mut self, other: &mut Self) {
                mem::swap(&mut self.0, &mut other.0);
            }

            /// Returns a shared reference to the observed value.
            ///
            /// An absent observer panics if
            /// [`CONFIG.assert_on_null_dereference`](crate::ObserverConfig) is on,
            /// see [`try_as_ref`](Self::try_as_ref) for a checked version.
            ///
            /// # Safety
            ///
            /// - The observer must not be absent.
            /// - The address must be [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion)
            ///   for the whole lifetime `'a`.
            #[inline]
            #[cfg_attr(debug_assertions, track_caller)]
            pub unsafe fn as_ref<'a>(&self) -> &'a T {
                let Some(ptr) = self.0 else {
                    // SAFETY: the caller guarantees the observer is not absent.
                    unsafe { absent_dereference::<T>() }
                };
                // SAFETY: See `NonNull::as_ref`
                unsafe { ptr.as_ref() }
            }

            /// Returns a shared reference to the observed value, or
            /// [`DerefError::Absent`] if nothing is observed.
            ///
            /// # Safety
            ///
            /// If present, the address must be [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion)
            /// for the whole lifetime `'a`.
            #[inline]
            pub unsafe fn try_as_ref<'a>(&self) -> Result<&'a T, DerefError> {
                match self.0 {
                    // SAFETY: See `NonNull::as_ref`
                    Some(ptr) => Ok(unsafe { ptr.as_ref() }),
                    None => Err(DerefError::absent::<T>()),
                }
            }
        }

        impl<T: ?Sized> Clone for $observer<T> {
            #[inline(always)]
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T: ?Sized> Copy for $observer<T> {}

        impl<T: ?Sized> Default for $observer<T> {
            #[inline(always)]
            fn default() -> Self {
                Self::null()
            }
        }

        impl<T: ?Sized> From<Option<$addr<T>>> for $observer<T> {
            #[inline(always)]
            fn from(value: Option<$addr<T>>) -> Self {
                Self(value)
            }
        }

        impl<T: ?Sized> From<$addr<T>> for $observer<T> {
            #[inline(always)]
            fn from(value: $addr<T>) -> Self {
                Self(Some(value))
            }
        }

        impl<'a, T: ?Sized> From<&'a mut T> for $observer<T> {
            #[inline]
            fn from(value: &'a mut T) -> Self {
                Self::from_mut(value)
            }
        }

        #[cfg(feature = "implicit_conversion")]
        impl<T: ?Sized> From<$observer<T>> for bool {
            #[inline(always)]
            fn from(value: $observer<T>) -> Self {
                value.is_observing()
            }
        }

        #[cfg(feature = "implicit_conversion")]
        impl<T> From<$observer<T>> for $raw {
            #[inline(always)]
            fn from(value: $observer<T>) -> Self {
                value.as_ptr()
            }
        }

        impl<T: ?Sized> fmt::Pointer for $observer<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&crate::cmp::Observer::address(self), f)
            }
        }

        impl<T: ?Sized> fmt::Debug for $observer<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.0 {
                    Some(ptr) => write!(f, "{}({:p})", stringify!($observer), ptr),
                    None => write!(f, "{}(null)", stringify!($observer)),
                }
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ObserverPtr

/// A non-owning, read-only observer of a `T`, similar to `*const T`.
///
/// The observer documents that the holder looks at the value but does not
/// own it. It never drops, frees or keeps the pointee alive, and it can
/// become dangling when the pointee is destroyed elsewhere. Only the
/// address is stored, so it has the size of a pointer.
///
/// Dereferencing is `unsafe` for the same reasons as dereferencing a raw
/// pointer. No pointer arithmetic is offered.
///
/// # Examples
///
/// ```
/// use observer_ptr::ObserverPtr;
///
/// fn read(p: ObserverPtr<i32>) -> i32 {
///     unsafe { *p.as_ref() }
/// }
///
/// let a = 42;
/// let p = ObserverPtr::from_ref(&a);
///
/// assert!(p.is_observing());
/// assert_eq!(read(p), 42);
/// ```
///
/// An observer of a writable value converts into a read-only one, never the
/// other way round:
///
/// ```compile_fail
/// use observer_ptr::{ObserverPtr, ObserverPtrMut};
///
/// let a = 1;
/// let p = ObserverPtr::from_ref(&a);
/// let q: ObserverPtrMut<i32> = p.into();
/// ```
#[repr(transparent)]
pub struct ObserverPtr<T: ?Sized>(Option<ConstNonNull<T>>);

impl_observer!(ObserverPtr, ConstNonNull, *const T);

impl<T: ?Sized> ObserverPtr<T> {
    /// Observes `ptr`. A null `ptr` creates an absent observer.
    ///
    /// No validation is performed, a dangling `ptr` is accepted as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use observer_ptr::ObserverPtr;
    ///
    /// let x = 5u8;
    /// let p = ObserverPtr::new(&raw const x);
    /// assert_eq!(p.as_ptr(), &raw const x);
    ///
    /// let q = ObserverPtr::new(core::ptr::null::<u8>());
    /// assert!(q.is_null());
    /// ```
    #[inline(always)]
    pub const fn new(ptr: *const T) -> Self {
        Self(ConstNonNull::new(ptr))
    }

    /// Observes the value behind a reference.
    #[inline(always)]
    pub const fn from_ref(r: &T) -> Self {
        Self(Some(ConstNonNull::from_ref(r)))
    }

    /// Observes the value behind a mutable reference, read-only.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self(Some(ConstNonNull::from_mut(r)))
    }
}

impl<T> ObserverPtr<T> {
    /// Returns the observed address, null if absent.
    ///
    /// The address can be used for member access, nothing is dereferenced
    /// here.
    ///
    /// # Examples
    ///
    /// ```
    /// use observer_ptr::ObserverPtr;
    ///
    /// struct S { a: i32 }
    ///
    /// let s = S { a: 7 };
    /// let p = ObserverPtr::from_ref(&s);
    ///
    /// assert_eq!(unsafe { (*p.as_ptr()).a }, 7);
    /// assert!(ObserverPtr::<S>::null().as_ptr().is_null());
    /// ```
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        match self.0 {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null(),
        }
    }
}

impl<'a, T: ?Sized> From<&'a T> for ObserverPtr<T> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::from_ref(value)
    }
}

impl<T: ?Sized> From<ObserverPtrMut<T>> for ObserverPtr<T> {
    #[inline(always)]
    fn from(value: ObserverPtrMut<T>) -> Self {
        value.as_const()
    }
}

// SAFETY: `ObserverPtr<T>` only hands out `&T`, like `&T` it may cross
// threads when `T: Sync`. Dereferencing is `unsafe` regardless.
unsafe impl<T: ?Sized + Sync> Send for ObserverPtr<T> {}
// SAFETY: as above.
unsafe impl<T: ?Sized + Sync> Sync for ObserverPtr<T> {}

// -----------------------------------------------------------------------------
// ObserverPtrMut

/// A non-owning observer of a `T` that may be written through, similar to
/// `*mut T`.
///
/// Same contract as [`ObserverPtr`], plus [`as_mut`](Self::as_mut). It can be
/// narrowed to an [`ObserverPtr`] with [`as_const`](Self::as_const) or
/// [`From`], and compares with it by address.
///
/// # Examples
///
/// ```
/// use observer_ptr::{ObserverPtr, ObserverPtrMut};
///
/// let mut x = 8;
/// let mut p = ObserverPtrMut::from_mut(&mut x);
///
/// unsafe { *p.as_mut() += 2 };
///
/// let q: ObserverPtr<i32> = p.into();
/// assert_eq!(p, q);
/// assert_eq!(unsafe { *q.as_ref() }, 10);
/// ```
#[repr(transparent)]
pub struct ObserverPtrMut<T: ?Sized>(Option<NonNull<T>>);

impl_observer!(ObserverPtrMut, NonNull, *mut T);

impl<T: ?Sized> ObserverPtrMut<T> {
    /// Observes `ptr`. A null `ptr` creates an absent observer.
    ///
    /// No validation is performed, a dangling `ptr` is accepted as-is.
    #[inline(always)]
    pub const fn new(ptr: *mut T) -> Self {
        Self(NonNull::new(ptr))
    }

    /// Observes the value behind a mutable reference.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self(Some(NonNull::from_mut(r)))
    }

    /// Narrows to a read-only observer of the same address.
    #[inline]
    pub const fn as_const(self) -> ObserverPtr<T> {
        match self.0 {
            Some(ptr) => ObserverPtr(Some(ConstNonNull::from_non_null(ptr))),
            None => ObserverPtr(None),
        }
    }

    /// Returns a mutable reference to the observed value.
    ///
    /// An absent observer panics if
    /// [`CONFIG.assert_on_null_dereference`](crate::ObserverConfig) is on,
    /// see [`try_as_mut`](Self::try_as_mut) for a checked version.
    ///
    /// # Safety
    ///
    /// - The observer must not be absent.
    /// - The address must be [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion)
    ///   for the whole lifetime `'a`, and no other reference to the value may
    ///   be used during `'a`.
    #[inline]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn as_mut<'a>(&mut self) -> &'a mut T {
        let Some(mut ptr) = self.0 else {
            // SAFETY: the caller guarantees the observer is not absent.
            unsafe { absent_dereference::<T>() }
        };
        // SAFETY: See `NonNull::as_mut`
        unsafe { ptr.as_mut() }
    }

    /// Returns a mutable reference to the observed value, or
    /// [`DerefError::Absent`] if nothing is observed.
    ///
    /// # Safety
    ///
    /// Same as [`as_mut`](Self::as_mut), except that the observer may be absent.
    #[inline]
    pub unsafe fn try_as_mut<'a>(&mut self) -> Result<&'a mut T, DerefError> {
        match self.0 {
            // SAFETY: See `NonNull::as_mut`
            Some(mut ptr) => Ok(unsafe { ptr.as_mut() }),
            None => Err(DerefError::absent::<T>()),
        }
    }
}

impl<T> ObserverPtrMut<T> {
    /// Returns the observed address, null if absent.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        match self.0 {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }
}

// SAFETY: `ObserverPtrMut<T>` hands out both `&T` and `&mut T`.
unsafe impl<T: ?Sized + Send + Sync> Send for ObserverPtrMut<T> {}
// SAFETY: as above.
unsafe impl<T: ?Sized + Send + Sync> Sync for ObserverPtrMut<T> {}

// -----------------------------------------------------------------------------
// Free functions

/// Creates a read-only observer of `ptr`, inferring `T`.
///
/// # Examples
///
/// ```
/// use observer_ptr::make_observer;
///
/// let x = 3;
/// let p = make_observer(&raw const x);
/// assert_eq!(p, make_observer(&raw const x));
/// ```
#[inline(always)]
pub const fn make_observer<T: ?Sized>(ptr: *const T) -> ObserverPtr<T> {
    ObserverPtr::new(ptr)
}

/// Creates a writable observer of `ptr`, inferring `T`.
#[inline(always)]
pub const fn make_observer_mut<T: ?Sized>(ptr: *mut T) -> ObserverPtrMut<T> {
    ObserverPtrMut::new(ptr)
}

/// Exchanges the observed addresses of two observers of the same kind.
///
/// Same as the `swap` method of [`ObserverPtr`] and [`ObserverPtrMut`].
#[inline]
pub fn swap<O: crate::Observer>(a: &mut O, b: &mut O) {
    mem::swap(a, b);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::ptr::{self, NonNull};

    use super::{make_observer, make_observer_mut, swap};
    use super::{ObserverPtr, ObserverPtrMut};
    use crate::{ConstNonNull, DerefError};

    struct S {
        a: i32,
    }

    #[test]
    fn pointer_sized() {
        assert_eq!(size_of::<ObserverPtr<i32>>(), size_of::<*const i32>());
        assert_eq!(size_of::<ObserverPtrMut<i32>>(), size_of::<*mut i32>());
        assert_eq!(size_of::<ObserverPtr<[u8]>>(), size_of::<*const [u8]>());
    }

    #[test]
    fn is_sync_send() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<ObserverPtr<i32>>();
        is_sync::<ObserverPtr<i32>>();
        is_send::<ObserverPtrMut<i32>>();
        is_sync::<ObserverPtrMut<i32>>();
    }

    #[test]
    fn default_is_absent() {
        let p = ObserverPtr::<i32>::default();
        assert!(!p.is_observing());
        assert!(p.is_null());
        assert!(p.get().is_none());
        assert!(p.as_ptr().is_null());

        let q = ObserverPtrMut::<i32>::null();
        assert!(q.is_null());
        assert!(q.as_ptr().is_null());
    }

    #[test]
    fn construct_from_null() {
        let p = ObserverPtr::new(ptr::null::<i32>());
        assert!(p.is_null());

        let q = ObserverPtrMut::<i32>::from(None);
        assert!(q.is_null());
    }

    #[test]
    fn construct_keeps_address() {
        let a = 7;
        let p = ObserverPtr::new(&raw const a);
        assert_eq!(p.as_ptr(), &raw const a);
        assert_eq!(p.get(), Some(ConstNonNull::from_ref(&a)));
        assert!(p.is_observing());

        let mut b = 9;
        let q = ObserverPtrMut::new(&raw mut b);
        assert_eq!(q.as_ptr(), &raw mut b);
        assert_eq!(q.get(), Some(NonNull::from_mut(&mut b)));
    }

    #[test]
    fn construct_from_compatible() {
        let mut a = 7;
        let q = ObserverPtrMut::from_mut(&mut a);
        let p = ObserverPtr::from(q);

        assert_eq!(p.as_ptr(), q.as_ptr().cast_const());
        assert_eq!(q.as_const().get(), p.get());
        assert!(ObserverPtrMut::<i32>::null().as_const().is_null());
    }

    #[test]
    fn dereference() {
        let a = 7;
        let p = ObserverPtr::from_ref(&a);
        assert_eq!(unsafe { *p.as_ref() }, 7);

        let s = S { a: 7 };
        let p = ObserverPtr::from_ref(&s);
        assert_eq!(unsafe { p.as_ref() }.a, 7);
        assert_eq!(unsafe { (*p.as_ptr()).a }, 7);
    }

    #[test]
    fn write_through_mut() {
        let mut s = S { a: 7 };
        let mut p = ObserverPtrMut::from_mut(&mut s);

        unsafe { p.as_mut().a = 11 };
        unsafe { (*p.as_ptr()).a += 1 };

        assert_eq!(s.a, 12);
    }

    #[test]
    fn checked_dereference() {
        let a = 7;
        let p = ObserverPtr::from_ref(&a);
        assert_eq!(unsafe { p.try_as_ref() }, Ok(&7));

        let p = ObserverPtr::<i32>::null();
        assert_eq!(unsafe { p.try_as_ref() }, Err(DerefError::Absent("i32")));

        let mut q = ObserverPtrMut::<u8>::null();
        assert_eq!(unsafe { q.try_as_mut() }.err(), Some(DerefError::Absent("u8")));
    }

    #[test]
    #[cfg_attr(
        not(all(feature = "debug", debug_assertions)),
        ignore = "the assertion is compiled out"
    )]
    #[should_panic(expected = "absent observer")]
    fn absent_dereference_panics() {
        let p = ObserverPtr::<i32>::null();
        let _ = unsafe { p.as_ref() };
    }

    #[test]
    fn reset() {
        let a = 7;
        let mut p = ObserverPtr::from_ref(&a);
        p.reset();
        assert!(p.is_null());

        let b = 9;
        p.reset_to(&raw const b);
        assert_eq!(p.as_ptr(), &raw const b);

        p.reset_to(ptr::null());
        assert!(p.get().is_none());
    }

    #[test]
    fn release() {
        let a = 7;
        let mut p = ObserverPtr::<i32>::null();
        p.reset_to(&raw const a);

        let r = p.release();
        assert_eq!(r.map(|r| r.as_ptr()), Some(&raw const a));
        assert!(p.is_null());
        assert!(p.release().is_none());

        // The pointee is not touched.
        assert_eq!(a, 7);
    }

    #[test]
    fn swap_twice_restores() {
        let (a, b) = (1, 2);
        let mut p1 = ObserverPtr::from_ref(&a);
        let mut p2 = ObserverPtr::from_ref(&b);

        p1.swap(&mut p2);
        assert_eq!(p1.as_ptr(), &raw const b);
        assert_eq!(p2.as_ptr(), &raw const a);

        p1.swap(&mut p2);
        assert_eq!(p1.as_ptr(), &raw const a);
        assert_eq!(p2.as_ptr(), &raw const b);
    }

    #[test]
    fn free_swap() {
        let (mut a, mut b) = (1, 2);
        let mut p1 = make_observer_mut(&raw mut a);
        let mut p2 = make_observer_mut(&raw mut b);

        swap(&mut p1, &mut p2);
        assert_eq!(p1.as_ptr(), &raw mut b);
        assert_eq!(p2.as_ptr(), &raw mut a);

        let mut p3 = ObserverPtrMut::null();
        swap(&mut p1, &mut p3);
        assert!(p1.is_null());
        assert_eq!(p3.as_ptr(), &raw mut b);
    }

    #[test]
    fn make_observer_infers_type() {
        let a = 42;
        let p = make_observer(&raw const a);
        let _: ObserverPtr<i32> = p;
        assert_eq!(unsafe { *p.as_ref() }, 42);
    }

    #[test]
    fn unsized_pointee() {
        let arr = [7, 9];
        let p: ObserverPtr<[i32]> = ObserverPtr::from_ref(&arr[..]);
        assert_eq!(unsafe { p.as_ref() }.len(), 2);

        let s: &dyn core::fmt::Debug = &arr;
        let p = ObserverPtr::from_ref(s);
        assert!(p.is_observing());
    }

    #[test]
    fn formatting() {
        use alloc::format;

        let p = ObserverPtr::<i32>::null();
        assert_eq!(format!("{p:?}"), "ObserverPtr(null)");

        let a = 7;
        let p = ObserverPtr::from_ref(&a);
        assert_eq!(format!("{p:p}"), format!("{:p}", &raw const a));
        assert!(format!("{p:?}").starts_with("ObserverPtr(0x"));
    }

    #[cfg(feature = "implicit_conversion")]
    #[test]
    fn implicit_conversion() {
        let a = 7;
        let p = ObserverPtr::from_ref(&a);

        let raw: *const i32 = p.into();
        assert_eq!(raw, &raw const a);
        assert!(bool::from(p));
        assert!(!bool::from(ObserverPtrMut::<i32>::null()));
    }
}
