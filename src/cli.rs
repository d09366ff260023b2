use std::ffi::OsString;

use clap::Parser;

use crate::error::{MatmulError, Result};
use crate::matrix::element_count;

/// Multiply two random n×n matrices and report the compute time.
#[derive(Parser, Debug)]
#[command(version)]
pub struct SizeArgs {
    /// Matrix dimension n (positive integer)
    #[arg(allow_negative_numbers = true)]
    pub size: i64,
}

/// Parse `<program> <n>` into a positive size.
///
/// Argument errors come back as [`MatmulError::Usage`]; help and version
/// requests too, flagged by [`MatmulError::is_informational`].
pub fn parse_size<I, T>(args: I) -> Result<usize>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = SizeArgs::try_parse_from(args)?;
    if args.size <= 0 {
        return Err(MatmulError::InvalidSize(args.size));
    }
    let n = usize::try_from(args.size).map_err(|_| MatmulError::SizeTooLarge(args.size))?;
    if element_count(n).is_none() {
        return Err(MatmulError::SizeTooLarge(args.size));
    }
    Ok(n)
}
