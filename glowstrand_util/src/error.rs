use alloc::collections::TryReserveError;

use derive_more::{Display, Error};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The framebuffer could not grow to hold a new frame. The driver's
    /// previous frame is left in place.
    #[display("failed to allocate {requested} bytes for the frame buffer")]
    Alloc {
        requested: usize,
        source: TryReserveError,
    },
}

impl Error {
    pub(crate) fn alloc(requested: usize, source: TryReserveError) -> Self {
        Self::Alloc { requested, source }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn alloc_failure_keeps_reserve_error_as_source() {
        let reserve_error = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();

        let error = Error::alloc(usize::MAX, reserve_error.clone());

        assert!(matches!(
            &error,
            Error::Alloc { requested: usize::MAX, source } if *source == reserve_error
        ));
        assert_eq!(
            error.to_string(),
            "failed to allocate 18446744073709551615 bytes for the frame buffer"
        );
        assert!(core::error::Error::source(&error).is_some());
    }
}
