//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Version string baked in at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("BETHINI_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Write the version line to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "bethini {}", version())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn writes_single_line() {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("bethini "));
        assert_eq!(text.lines().count(), 1);
    }
}
