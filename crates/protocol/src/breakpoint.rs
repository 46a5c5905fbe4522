//! Responsive breakpoints for the dashboard grid.
//!
//! Each breakpoint is a named width tier with a fixed number of grid columns.
//! Layouts are stored per breakpoint so the dashboard can rearrange itself
//! when the available width changes.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// A named responsive width tier.
///
/// Variants are declared widest first, so the derived ordering sorts
/// breakpoints from `Lg` down to `Xxs`.
///
/// # Examples
///
/// ```
/// use divedash_protocol::Breakpoint;
///
/// assert_eq!(Breakpoint::Lg.columns(), 12);
/// assert_eq!(Breakpoint::Xxs.columns(), 2);
/// assert!(Breakpoint::Lg < Breakpoint::Md);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Wide screens, 12 columns.
    Lg,
    /// Medium screens, 10 columns.
    Md,
    /// Small screens, 6 columns.
    Sm,
    /// Extra small screens, 4 columns.
    Xs,
    /// Narrowest screens, 2 columns.
    Xxs,
}

impl Breakpoint {
    /// Returns all breakpoints, widest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::Breakpoint;
    ///
    /// let all = Breakpoint::all();
    /// assert_eq!(all.len(), 5);
    /// assert_eq!(all[0], Breakpoint::Lg);
    /// ```
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [Self::Lg, Self::Md, Self::Sm, Self::Xs, Self::Xxs]
    }

    /// Returns the number of grid columns at this breakpoint.
    #[must_use]
    pub const fn columns(self) -> u16 {
        match self {
            Self::Lg => 12,
            Self::Md => 10,
            Self::Sm => 6,
            Self::Xs => 4,
            Self::Xxs => 2,
        }
    }

    /// Returns the wire name of this breakpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::Breakpoint;
    ///
    /// assert_eq!(Breakpoint::Xxs.name(), "xxs");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lg => "lg",
            Self::Md => "md",
            Self::Sm => "sm",
            Self::Xs => "xs",
            Self::Xxs => "xxs",
        }
    }

    /// Parses a breakpoint from its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownBreakpoint`] for any name other than
    /// the five recognized ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::Breakpoint;
    ///
    /// assert_eq!(Breakpoint::from_name("md").unwrap(), Breakpoint::Md);
    /// assert!(Breakpoint::from_name("xl").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|bp| bp.name() == name)
            .ok_or_else(|| ProtocolError::UnknownBreakpoint(name.to_string()))
    }

    /// Returns `true` for the two narrowest breakpoints, where items are
    /// stacked in a single column.
    #[must_use]
    pub const fn is_single_column(self) -> bool {
        matches!(self, Self::Xs | Self::Xxs)
    }

    /// Picks the breakpoint for a viewport of the given width, in terminal
    /// cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::Breakpoint;
    ///
    /// assert_eq!(Breakpoint::for_width(200), Breakpoint::Lg);
    /// assert_eq!(Breakpoint::for_width(100), Breakpoint::Sm);
    /// assert_eq!(Breakpoint::for_width(20), Breakpoint::Xxs);
    /// ```
    #[must_use]
    pub const fn for_width(width: u16) -> Self {
        match width {
            160.. => Self::Lg,
            120.. => Self::Md,
            90.. => Self::Sm,
            60.. => Self::Xs,
            _ => Self::Xxs,
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_counts_are_fixed() {
        let columns: Vec<u16> = Breakpoint::all().iter().map(|bp| bp.columns()).collect();
        assert_eq!(columns, vec![12, 10, 6, 4, 2]);
    }

    #[test]
    fn names_roundtrip() {
        for bp in Breakpoint::all() {
            assert_eq!(Breakpoint::from_name(bp.name()).unwrap(), bp);
        }
    }

    #[test]
    fn json_uses_lowercase_names() {
        let json = serde_json::to_string(&Breakpoint::Xxs).expect("serialize");
        assert_eq!(json, r#""xxs""#);
    }

    #[test]
    fn only_narrow_breakpoints_stack() {
        assert!(!Breakpoint::Sm.is_single_column());
        assert!(Breakpoint::Xs.is_single_column());
        assert!(Breakpoint::Xxs.is_single_column());
    }

    #[test]
    fn width_thresholds() {
        assert_eq!(Breakpoint::for_width(160), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(159), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(120), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(90), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(60), Breakpoint::Xs);
        assert_eq!(Breakpoint::for_width(59), Breakpoint::Xxs);
    }
}
