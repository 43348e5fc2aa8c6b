//! [`Bitboard`] is the set-of-squares type used for raw moves, potential
//! (legal) moves and attack sets. A 10×10 board needs 100 bits, hence the
//! [u128] backing store: set operations over a whole attack set stay a single
//! integer operation.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use itertools::Itertools;

use crate::chess::core::{Square, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares and provides common operations (e.g. AND, OR)
/// over these sets. Each bit corresponds to one of 100 squares of the board.
///
/// Mirroring [`Square`] semantics, the least significant bit corresponds to
/// A1, and bit 99 to J10. Bits 100..128 are never set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u128,
}

const BOARD_MASK: u128 = (1u128 << BOARD_SIZE) - 1;

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits. Bits outside of the board
    /// are dropped.
    #[must_use]
    pub const fn from_bits(bits: u128) -> Self {
        Self {
            bits: bits & BOARD_MASK,
        }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u128 << square.index())) != 0
    }

    /// Adds the square to the set.
    pub fn insert(&mut self, square: Square) {
        self.bits |= 1u128 << square.index();
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// An efficient way to iterate over the set squares, from A1 to J10.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..BOARD_SIZE)
                .map(|index| if (self.bits >> index) & 1 == 1 { '1' } else { '.' })
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|mut rank| rank.join(" "))
                .collect::<Vec<String>>()
                .iter()
                .rev()
                .join("\n")
        )
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u128 << square.index())
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut result = Self::empty();
        for square in iter {
            result.insert(square);
        }
        result
    }
}

impl IntoIterator for Bitboard {
    type IntoIter = BitboardIterator;
    type Item = Square;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u128,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits ^= 1 << next_index;
        // trailing_zeros() is within 0..BOARD_SIZE because of the board mask.
        Square::try_from(next_index as u8).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIterator {}
