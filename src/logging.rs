//! Logging backend selection
//!
//! On the board everything goes through defmt. Host builds (tests, tools)
//! use the `log` facade so no defmt global logger is needed. With neither
//! feature the macros compile to nothing.

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
pub(crate) use defmt::{debug, info, trace, warn};

#[cfg(all(feature = "log", not(feature = "defmt")))]
#[allow(unused_imports)]
pub(crate) use log::{debug, info, trace, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
mod silent {
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }

    #[allow(unused_imports)]
    pub(crate) use {debug, info, trace, warn};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
#[allow(unused_imports)]
pub(crate) use silent::{debug, info, trace, warn};
