//! Mode bits, permission columns and `chmod` mode strings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ShellError, ShellResult};

/// A permission bit within one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Perm {
    Read,
    Write,
    Execute,
}

impl Perm {
    fn offset(self) -> u8 {
        match self {
            Perm::Read => 2,
            Perm::Write => 1,
            Perm::Execute => 0,
        }
    }
}

/// Which permission column applies to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    Owner,
    Other,
}

impl Class {
    fn offset(self) -> u8 {
        match self {
            Class::Owner => 3,
            Class::Other => 0,
        }
    }
}

/// 7-bit node mode: bit 6 is the directory flag, bits 5..3 the owner rwx
/// column, bits 2..0 the other rwx column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Mode(u8);

impl Mode {
    pub const DIRECTORY_BIT: u8 = 0b100_0000;
    pub const PERMISSION_BITS: u8 = 0b011_1111;

    /// `drwxr-x`, used for the root and for new directories.
    pub const DEFAULT_DIRECTORY: Mode = Mode(0b111_1101);
    /// `-rw-r--`, used for new files.
    pub const DEFAULT_FILE: Mode = Mode(0b011_0100);

    pub const fn new(bits: u8) -> Self {
        Self(bits & (Self::DIRECTORY_BIT | Self::PERMISSION_BITS))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_dir(self) -> bool {
        self.0 & Self::DIRECTORY_BIT != 0
    }

    pub fn allows(self, class: Class, perm: Perm) -> bool {
        self.0 & (1 << (class.offset() + perm.offset())) != 0
    }

    /// The 6 permission bits, without the type bit.
    pub const fn permissions(self) -> u8 {
        self.0 & Self::PERMISSION_BITS
    }

    /// Same type bit, new permission bits.
    pub const fn with_permissions(self, perms: u8) -> Self {
        Self((self.0 & Self::DIRECTORY_BIT) | (perms & Self::PERMISSION_BITS))
    }
}

impl From<u8> for Mode {
    fn from(bits: u8) -> Self {
        Self::new(bits)
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode.0
    }
}

impl fmt::Display for Mode {
    /// Renders `ls -l` style, bit 6 down to bit 0: `d r w x r w x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [char; 7] = ['x', 'w', 'r', 'x', 'w', 'r', 'd'];
        for bit in (0..7).rev() {
            let c = if self.0 & (1 << bit) != 0 { LETTERS[bit] } else { '-' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeOp {
    Add,
    Remove,
    Set,
}

/// A parsed `chmod` mode string such as `u+x`, `ao-rw` or `o=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeChange {
    owner: bool,
    other: bool,
    op: ModeOp,
    mask: u8,
}

impl ModeChange {
    pub fn parse(text: &str) -> ShellResult<Self> {
        let (at, op) = text
            .char_indices()
            .find_map(|(i, c)| match c {
                '+' => Some((i, ModeOp::Add)),
                '-' => Some((i, ModeOp::Remove)),
                '=' => Some((i, ModeOp::Set)),
                _ => None,
            })
            .ok_or(ShellError::InvalidMode)?;
        let (who, what) = (&text[..at], &text[at + 1..]);
        if who.is_empty() {
            return Err(ShellError::InvalidMode);
        }

        let (mut owner, mut other) = (false, false);
        for c in who.chars() {
            match c {
                'u' => owner = true,
                'o' => other = true,
                'a' => {
                    owner = true;
                    other = true;
                }
                _ => return Err(ShellError::InvalidMode),
            }
        }

        let mut mask = 0;
        for c in what.chars() {
            mask |= match c {
                'r' => 0b100,
                'w' => 0b010,
                'x' => 0b001,
                _ => return Err(ShellError::InvalidMode),
            };
        }

        Ok(Self {
            owner,
            other,
            op,
            mask,
        })
    }

    /// Applies the change to `mode`; the directory bit is never touched.
    pub fn apply(&self, mode: Mode) -> Mode {
        let perms = mode.permissions();
        let mut owner_bits = perms >> 3;
        let mut other_bits = perms & 0b111;
        let update = |bits: &mut u8| {
            *bits = match self.op {
                ModeOp::Add => *bits | self.mask,
                ModeOp::Remove => *bits & !self.mask,
                ModeOp::Set => self.mask,
            }
        };
        if self.owner {
            update(&mut owner_bits);
        }
        if self.other {
            update(&mut other_bits);
        }
        mode.with_permissions((owner_bits << 3) | other_bits)
    }
}
