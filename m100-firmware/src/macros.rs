#[allow(unused)]
#[cfg(all(not(test), not(feature = "defmt"), not(feature = "test-utils")))]
mod no_defmt {
    #[macro_export]
    macro_rules! debug {
    ($($arg:expr),*) => {{let _ = ($($arg),*);}};
}

    #[macro_export]
    macro_rules! info {
    ($($arg:expr),*) => {{let _ = ($($arg),*);}};
}

    #[macro_export]
    macro_rules! warn {
    ($($arg:expr),*) => {{let _ = ($($arg),*);}};
}

    #[macro_export]
    macro_rules! error {
    ($($arg:expr),*) => {{let _ = ($($arg),*);}};
}
}

#[cfg(all(not(test), not(feature = "test-utils"), feature = "defmt"))]
mod defmt {
    /// Log debug messages. It will call the [defmt::debug] macro.
    ///
    /// This macro works with either defmt or nothing. When testing on the host operating system
    /// `eprintln!` is called instead, so only the `{}` and `{:?}` placeholders may be used and every
    /// argument must implement both `Debug` and [defmt::Format].
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {
            defmt::debug!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {
            defmt::info!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {
            defmt::warn!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {
            defmt::error!($($arg,)*)
        };
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod test {
    #[macro_export]
    macro_rules! debug {
    ($($arg:expr),*) => {{
        extern crate std;
        std::eprintln!("DEBUG: {}",  format_args!($($arg,)*))
    }};
}

    #[macro_export]
    macro_rules! info {
    ($($arg:expr),*) => {{
        extern crate std;
        std::eprintln!("INFO: {}",  format_args!($($arg,)*))
    }};
}

    #[macro_export]
    macro_rules! warn {
    ($($arg:expr),*) => {{
        extern crate std;
        std::eprintln!("WARN: {}",  format_args!($($arg,)*))
    }};
}

    #[macro_export]
    macro_rules! error {
    ($($arg:expr),*) => {{
        extern crate std;
        std::eprintln!("\nERROR: at ./{}:{}:{}:\n{}", file!(), line!(), column!(), format_args!($($arg,)*));
    }};
}
}
