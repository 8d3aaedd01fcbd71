//! Types in this module are public but unreachable, so traits whose methods
//! mention them can only be implemented inside this crate.

/// Third parties can't name this type, so they can't implement
/// `__private__`.
pub struct PrivateMarker;

macro_rules! private_decl {
    () => {
        /// Sealing method; the trait is only implemented inside ndview.
        #[doc(hidden)]
        fn __private__(&self) -> crate::private::PrivateMarker;
    };
}

macro_rules! private_impl {
    () => {
        fn __private__(&self) -> crate::private::PrivateMarker {
            crate::private::PrivateMarker
        }
    };
}
