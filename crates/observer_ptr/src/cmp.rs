//! Identity, ordering and hashing of observers.
//!
//! [`ObserverPtr<T>`] and [`ObserverPtrMut<T>`] are both viewed as a
//! read-only thin address (null if absent) before being compared, so every
//! pairing of the two kinds orders the same way. Observers of different
//! element types cannot be compared at all:
//!
//! ```compile_fail
//! use observer_ptr::ObserverPtr;
//!
//! let (a, b) = (1i32, 1u32);
//! let _ = ObserverPtr::from_ref(&a) == ObserverPtr::from_ref(&b);
//! ```
//!
//! ```compile_fail
//! use observer_ptr::ObserverPtr;
//!
//! let (a, b) = (1i32, 1u32);
//! let _ = ObserverPtr::from_ref(&a) < ObserverPtr::from_ref(&b);
//! ```

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::ptr::{self, NonNull};

use crate::non_null::ConstNonNull;
use crate::observer::{ObserverPtr, ObserverPtrMut};

// -----------------------------------------------------------------------------
// Observer

mod sealed {
    pub trait Sealed {}

    impl<T: ?Sized> Sealed for super::ObserverPtr<T> {}
    impl<T: ?Sized> Sealed for super::ObserverPtrMut<T> {}
}

/// Common view of [`ObserverPtr`] and [`ObserverPtrMut`].
///
/// This trait is sealed.
pub trait Observer: sealed::Sealed + Copy {
    /// The observed type.
    type Element: ?Sized;

    /// The observed data address, null if absent.
    ///
    /// Metadata of wide pointers is dropped, `ObserverPtr<[T]>` of a slice
    /// and of its first half have the same address.
    fn address(&self) -> *const ();
}

impl<T: ?Sized> Observer for ObserverPtr<T> {
    type Element = T;

    #[inline]
    fn address(&self) -> *const () {
        match self.get() {
            Some(ptr) => ConstNonNull::thin(&ptr),
            None => ptr::null(),
        }
    }
}

impl<T: ?Sized> Observer for ObserverPtrMut<T> {
    type Element = T;

    #[inline]
    fn address(&self) -> *const () {
        match self.get() {
            Some(ptr) => NonNull::as_ptr(ptr).cast_const().cast::<()>(),
            None => ptr::null(),
        }
    }
}

// -----------------------------------------------------------------------------
// Comparison

macro_rules! impl_cmp {
    ($observer:ident) => {
        impl<T: ?Sized, O: Observer<Element = T>> PartialEq<O> for $observer<T> {
            #[inline]
            fn eq(&self, other: &O) -> bool {
                self.address() == other.address()
            }
        }

        impl<T: ?Sized> Eq for $observer<T> {}

        // `<`, `>`, `<=` and `>=` all come from `partial_cmp`.
        impl<T: ?Sized, O: Observer<Element = T>> PartialOrd<O> for $observer<T> {
            #[inline]
            fn partial_cmp(&self, other: &O) -> Option<Ordering> {
                Some(self.address().cmp(&other.address()))
            }
        }

        impl<T: ?Sized> Ord for $observer<T> {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                self.address().cmp(&other.address())
            }
        }

        impl<T: ?Sized> Hash for $observer<T> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.address().hash(state);
            }
        }
    };
}

impl_cmp!(ObserverPtr);
impl_cmp!(ObserverPtrMut);
