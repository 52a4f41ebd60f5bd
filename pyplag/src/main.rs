//! Binary entry point for pyplag inside the library crate.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function
//! so it behaves exactly like the `pyplag` binary of the `pyplag-cli` crate.

use anyhow::Result;

fn main() -> Result<()> {
    let code = pyplag::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
