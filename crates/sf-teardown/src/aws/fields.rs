//! Uniform access to SDK shape members
//!
//! Smithy models mark some identifiers as required and others as optional,
//! and the generated accessors follow suit (`&str` vs `Option<&str>`). The
//! conversion code below reads both the same way.

/// A generated accessor result that may or may not be optional
pub(crate) trait SdkField<'a, T: ?Sized> {
    fn into_option(self) -> Option<&'a T>;
}

impl<'a, T: ?Sized> SdkField<'a, T> for &'a T {
    fn into_option(self) -> Option<&'a T> {
        Some(self)
    }
}

impl<'a, T: ?Sized> SdkField<'a, T> for Option<&'a T> {
    fn into_option(self) -> Option<&'a T> {
        self
    }
}

/// Read a string member as an owned `Option<String>`
pub(crate) fn opt_string<'a>(field: impl SdkField<'a, str>) -> Option<String> {
    field.into_option().map(str::to_string)
}

/// Read a string member, using an empty string when it is absent
pub(crate) fn string<'a>(field: impl SdkField<'a, str>) -> String {
    opt_string(field).unwrap_or_default()
}
