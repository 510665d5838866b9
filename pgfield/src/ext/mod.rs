//! Extension traits.
use std::fmt;

/// Helper trait to [`Display`][fmt::Display] field bytes.
pub trait FmtExt {
    /// Printable ascii as is, other bytes escaped as hex.
    fn lossy(&self) -> LossyFmt<'_>;
}

/// Lossy [`Display`][fmt::Display] implementation for field bytes.
pub struct LossyFmt<'a>(pub &'a [u8]);

impl FmtExt for [u8] {
    fn lossy(&self) -> LossyFmt<'_> {
        LossyFmt(self)
    }
}

impl fmt::Display for LossyFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            match b {
                b' ' => f.write_str(" ")?,
                b if b.is_ascii_graphic() => write!(f, "{}", b as char)?,
                b => write!(f, "\\x{b:02x}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for LossyFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{self}\"")
    }
}
