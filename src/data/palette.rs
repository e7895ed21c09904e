use serenity::utils::Colour;

/// Red through violet.
pub(crate) const PALETTE: [Colour; 7] = [
    Colour(0xff0000),
    Colour(0xff7f00),
    Colour(0xffff00),
    Colour(0x00ff00),
    Colour(0x0000ff),
    Colour(0x4b0082),
    Colour(0x8b00ff),
];

/// Position in [`PALETTE`]. Starts at the first entry and moves before it is
/// read, so the first colour handed out is `PALETTE[1]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PaletteCursor {
    index: usize,
}

impl PaletteCursor {
    #[cfg(test)]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn advance(&mut self) -> Colour {
        self.index = (self.index + 1) % PALETTE.len();
        PALETTE[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_colour_is_orange() {
        let mut cursor = PaletteCursor::default();
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.advance(), Colour(0xff7f00));
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn tick_n_uses_next_entry_and_wraps_every_seven() {
        let mut cursor = PaletteCursor::default();
        for n in 0..30 {
            assert_eq!(cursor.advance(), PALETTE[(n + 1) % PALETTE.len()], "tick {}", n);
        }
    }

    #[test]
    fn wraps_back_to_red() {
        let mut cursor = PaletteCursor::default();
        for _ in 0..6 {
            cursor.advance();
        }
        assert_eq!(cursor.advance(), Colour(0xff0000));
        assert_eq!(cursor.index(), 0);
    }
}
