use core::fmt;

// Basic intra-project error type. Only raised while building configuration; estimation never fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum XError {
    /// Raw chemistry flag with no matching discharge curve.
    InvalidChemistry(u8),
    NoCells,
    InvalidThreshold,
    InvalidCapacity,
    /// Breakpoint at this index is not strictly above its predecessor's voltage.
    UnorderedBreakpoints(usize),
    /// Breakpoint at this index has a fraction outside [0, 1] or below its predecessor's.
    InvalidFraction(usize),
}

impl fmt::Display for XError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XError::InvalidChemistry(raw) => write!(f, "unsupported battery chemistry flag {}", raw),
            XError::NoCells => write!(f, "cell count must be at least 1"),
            XError::InvalidThreshold => write!(f, "full threshold must be a positive voltage"),
            XError::InvalidCapacity => write!(f, "capacity must be a finite, non-negative energy"),
            XError::UnorderedBreakpoints(index) => {
                write!(f, "breakpoint {} voltage does not increase", index)
            }
            XError::InvalidFraction(index) => {
                write!(f, "breakpoint {} capacity fraction is invalid", index)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for XError {}

pub type XResult<T> = Result<T, XError>;
