/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result`, or logs the error with some context and exits the process.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr, $context:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{}: {}", $context, e);
                std::process::exit(1);
            }
        }
    };
}
