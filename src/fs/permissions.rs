//! Unix permission triples and 3-digit octal modes.

use std::fmt;

use super::entry::EntryKind;
use crate::error::{Error, Result};

/// Read/write/execute bits for one subject class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permission {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Permission {
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        Self {
            read,
            write,
            execute,
        }
    }

    /// `4*read + 2*write + 1*execute`.
    pub fn to_octal_digit(self) -> u8 {
        (self.read as u8) * 4 + (self.write as u8) * 2 + self.execute as u8
    }

    /// Inverse of [`Permission::to_octal_digit`]. Digits above 7 are rejected.
    pub fn from_octal_digit(digit: u8) -> Option<Self> {
        if digit > 7 {
            return None;
        }
        Some(Self::new(digit & 4 != 0, digit & 2 != 0, digit & 1 != 0))
    }

    /// `rwx`-style rendering, e.g. `r-x`.
    pub fn symbolic(self) -> String {
        let mut s = String::with_capacity(3);
        s.push(if self.read { 'r' } else { '-' });
        s.push(if self.write { 'w' } else { '-' });
        s.push(if self.execute { 'x' } else { '-' });
        s
    }
}

/// Concatenate owner, group and others digits, in that order.
pub fn to_mode(owner: Permission, group: Permission, others: Permission) -> String {
    format!(
        "{}{}{}",
        owner.to_octal_digit(),
        group.to_octal_digit(),
        others.to_octal_digit()
    )
}

/// A full owner/group/others mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub owner: Permission,
    pub group: Permission,
    pub others: Permission,
}

impl Mode {
    /// Default shown when permission editing begins. This is not the entry's
    /// real mode; the daemon offers no way to read it.
    pub fn default_for(kind: EntryKind) -> Self {
        match kind {
            // rwxr-xr-x
            EntryKind::Folder => Self {
                owner: Permission::new(true, true, true),
                group: Permission::new(true, false, true),
                others: Permission::new(true, false, true),
            },
            // rw-r--r--
            EntryKind::File => Self {
                owner: Permission::new(true, true, false),
                group: Permission::new(true, false, false),
                others: Permission::new(true, false, false),
            },
        }
    }

    /// Parse a 3-digit octal string such as `"755"`.
    pub fn parse(mode: &str) -> Result<Self> {
        let digits: Vec<u8> = mode
            .trim()
            .chars()
            .map(|c| c.to_digit(8).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| Error::InvalidMode(mode.to_string()))?;

        let [owner, group, others] = digits[..] else {
            return Err(Error::InvalidMode(mode.to_string()));
        };

        let digit = |d| {
            Permission::from_octal_digit(d).ok_or_else(|| Error::InvalidMode(mode.to_string()))
        };
        Ok(Self {
            owner: digit(owner)?,
            group: digit(group)?,
            others: digit(others)?,
        })
    }

    /// Octal string, e.g. `"644"`.
    pub fn octal(&self) -> String {
        to_mode(self.owner, self.group, self.others)
    }

    /// Symbolic string, e.g. `"rw-r--r--"`.
    pub fn symbolic(&self) -> String {
        format!(
            "{}{}{}",
            self.owner.symbolic(),
            self.group.symbolic(),
            self.others.symbolic()
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.octal())
    }
}
