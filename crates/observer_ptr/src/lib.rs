//! This crate provides non-owning pointer wrappers, the `observer_ptr` of the
//! C++ Library Fundamentals TS.
//!
//! An observer replaces a raw pointer that means "I look at this value but do
//! not own it". It never frees, drops or keeps alive what it points to, and
//! it offers no pointer arithmetic.
//!
//! **ObserverPtr** and **ObserverPtrMut**
//!
//! [`ObserverPtr<T>`] and [`ObserverPtrMut<T>`] are the observer equivalents
//! of `*const T` and `*mut T`. Both may be absent (null), both have the size
//! of a pointer. An `ObserverPtrMut<T>` converts into an `ObserverPtr<T>`,
//! and the two compare with each other by address.
//!
//! Dereferencing is `unsafe`: the observed value may have been destroyed
//! elsewhere. An absent observer is checked in debug builds, see [`CONFIG`].
//!
//! **ConstNonNull**
//!
//! [`ConstNonNull<T>`] is similar to [`NonNull<T>`](core::ptr::NonNull): a non-null
//! pointer that cannot be used to obtain mutable references directly.
//!
//! # Examples
//!
//! ```
//! use observer_ptr::{ObserverPtr, make_observer};
//!
//! let arr = [7, 9];
//! let p1 = ObserverPtr::from_ref(&arr[0]);
//! let p2 = make_observer(&raw const arr[1]);
//!
//! assert!(p1 < p2);
//! assert_eq!(unsafe { *p2.as_ref() }, 9);
//! ```
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(test)]
extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cmp;
mod config;
mod error;
mod non_null;
mod observer;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cmp::Observer;
pub use config::{CONFIG, ObserverConfig};
pub use error::DerefError;
pub use non_null::ConstNonNull;
pub use observer::{ObserverPtr, ObserverPtrMut};
pub use observer::{make_observer, make_observer_mut, swap};
