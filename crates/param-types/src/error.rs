/// Closed set of ABI error codes, carried verbatim at the wire/ABI boundary.
///
/// The source collides `InvalidAction` and `Validation` on `-19`; this
/// implementation keeps the two distinct as the spec recommends, assigning
/// `Validation = -20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[repr(i32)]
pub enum Error {
    /// Generic failure with no more specific code.
    #[cfg_attr(feature = "std", error("general error ({})", self.as_code()))]
    Error = -9,
    /// The requested parameter does not exist.
    #[cfg_attr(feature = "std", error("no parameter ({})", self.as_code()))]
    NoParameter = -10,
    /// A required argument was null, empty, or otherwise malformed.
    #[cfg_attr(feature = "std", error("invalid argument ({})", self.as_code()))]
    InvalidArgument = -11,
    /// No node matched the requested id or path during lookup.
    #[cfg_attr(feature = "std", error("parameter not found ({})", self.as_code()))]
    ParameterNotFound = -12,
    /// A buffer was the wrong size for the requested operation.
    #[cfg_attr(feature = "std", error("size mismatch ({})", self.as_code()))]
    SizeMismatch = -13,
    /// An output buffer was too small to hold the maximum possible result.
    #[cfg_attr(feature = "std", error("buffer too small ({})", self.as_code()))]
    BufferTooSmall = -14,
    /// The access group does not hold the requested operation on this node.
    #[cfg_attr(feature = "std", error("permission denied ({})", self.as_code()))]
    PermissionDenied = -15,
    /// The requested codec or format is not implemented.
    #[cfg_attr(feature = "std", error("unsupported format ({})", self.as_code()))]
    UnsupportedFormat = -16,
    /// The requested conversion or operation is not defined for this kind.
    #[cfg_attr(feature = "std", error("not supported ({})", self.as_code()))]
    NotSupported = -17,
    /// A referenced file could not be located.
    #[cfg_attr(feature = "std", error("file not found ({})", self.as_code()))]
    FileNotFound = -18,
    /// The node has no storage and no extension could service the request.
    #[cfg_attr(feature = "std", error("invalid parameter action ({})", self.as_code()))]
    InvalidAction = -19,
    /// A validate extension rejected the value.
    #[cfg_attr(feature = "std", error("validation failed ({})", self.as_code()))]
    Validation = -20,
}

impl Error {
    /// The numeric ABI code for this error.
    pub const fn as_code(self) -> i32 {
        self as i32
    }

    /// Recover an `Error` from its numeric ABI code, if it names one.
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -9 => Error::Error,
            -10 => Error::NoParameter,
            -11 => Error::InvalidArgument,
            -12 => Error::ParameterNotFound,
            -13 => Error::SizeMismatch,
            -14 => Error::BufferTooSmall,
            -15 => Error::PermissionDenied,
            -16 => Error::UnsupportedFormat,
            -17 => Error::NotSupported,
            -18 => Error::FileNotFound,
            -19 => Error::InvalidAction,
            -20 => Error::Validation,
            _ => return None,
        })
    }

    #[cfg(not(feature = "std"))]
    fn message(self) -> &'static str {
        match self {
            Error::Error => "general error",
            Error::NoParameter => "no parameter",
            Error::InvalidArgument => "invalid argument",
            Error::ParameterNotFound => "parameter not found",
            Error::SizeMismatch => "size mismatch",
            Error::BufferTooSmall => "buffer too small",
            Error::PermissionDenied => "permission denied",
            Error::UnsupportedFormat => "unsupported format",
            Error::NotSupported => "not supported",
            Error::FileNotFound => "file not found",
            Error::InvalidAction => "invalid parameter action",
            Error::Validation => "validation failed",
        }
    }
}

/// `thiserror`'s derive covers `Display`/`std::error::Error` under `std`
/// (see the `#[cfg_attr(feature = "std", error("..."))]` attributes above);
/// `no_std` builds get this hand-written `Display` instead.
#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.message(), self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_wire_code() {
        for err in [
            Error::Error,
            Error::NoParameter,
            Error::InvalidArgument,
            Error::ParameterNotFound,
            Error::SizeMismatch,
            Error::BufferTooSmall,
            Error::PermissionDenied,
            Error::UnsupportedFormat,
            Error::NotSupported,
            Error::FileNotFound,
            Error::InvalidAction,
            Error::Validation,
        ] {
            assert_eq!(Error::from_code(err.as_code()), Some(err));
        }
    }

    #[test]
    fn invalid_action_and_validation_are_distinct() {
        assert_ne!(Error::InvalidAction.as_code(), Error::Validation.as_code());
        assert_eq!(Error::InvalidAction.as_code(), -19);
        assert_eq!(Error::Validation.as_code(), -20);
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Error::from_code(1), None);
        assert_eq!(Error::from_code(-100), None);
    }

    #[test]
    fn display_carries_the_numeric_code() {
        assert_eq!(format!("{}", Error::ParameterNotFound), "parameter not found (-12)");
    }
}
