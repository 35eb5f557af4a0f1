/// Build-time switches of the observer types.
///
/// Both values are resolved from cargo features when the crate is compiled,
/// they cannot be changed at runtime. Read them through [`CONFIG`].
///
/// # Examples
///
/// ```
/// use observer_ptr::CONFIG;
///
/// if CONFIG.assert_on_null_dereference {
///     // `as_ref` on an absent observer panics instead of being UB.
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Observers can be converted into raw pointers and `bool` through
    /// [`From`] / [`Into`].
    ///
    /// Off by default: an observer that silently turns back into a raw
    /// pointer no longer documents that it does not own the value.
    /// Enabled by the `implicit_conversion` feature.
    ///
    #[cfg_attr(not(feature = "implicit_conversion"), doc = "```compile_fail")]
    #[cfg_attr(feature = "implicit_conversion", doc = "```")]
    /// use observer_ptr::ObserverPtr;
    ///
    /// let a = 1;
    /// let raw: *const i32 = ObserverPtr::from_ref(&a).into();
    /// ```
    pub allow_implicit_underlying_conversion: bool,
    /// Dereferencing an absent observer panics.
    ///
    /// Enabled by the `debug` feature, only in builds with `debug_assertions`.
    /// When off, dereferencing an absent observer is undefined behavior, the
    /// same as dereferencing a null raw pointer.
    pub assert_on_null_dereference: bool,
}

/// The configuration this crate was compiled with.
pub const CONFIG: ObserverConfig = ObserverConfig {
    allow_implicit_underlying_conversion: cfg!(feature = "implicit_conversion"),
    assert_on_null_dereference: cfg!(all(feature = "debug", debug_assertions)),
};
