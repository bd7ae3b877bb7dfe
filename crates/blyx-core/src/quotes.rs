//! Rotating focus quotes.
//!
//! The ticker only moves while quotes are shown; a paused ticker keeps its
//! place and picks up from the same quote when shown again.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const fn quote(text: &'static str, author: &'static str) -> Quote {
    Quote { text, author }
}

pub const QUOTES: &[Quote] = &[
    quote("The secret of getting ahead is getting started.", "Mark Twain"),
    quote(
        "It does not matter how slowly you go as long as you do not stop.",
        "Confucius",
    ),
    quote(
        "Concentrate all your thoughts upon the work at hand.",
        "Alexander Graham Bell",
    ),
    quote(
        "Nothing is particularly hard if you divide it into small jobs.",
        "Henry Ford",
    ),
    quote("Well done is better than well said.", "Benjamin Franklin"),
    quote("You may delay, but time will not.", "Benjamin Franklin"),
];

pub const PAUSED_MESSAGE: &str = "Quotes are paused.";

/// Cursor over [`QUOTES`], wrapping at the end.
#[derive(Debug, Clone, Default)]
pub struct QuoteTicker {
    index: usize,
}

impl QuoteTicker {
    pub fn current(&self) -> Quote {
        QUOTES[self.index % QUOTES.len()]
    }

    /// Step to the next quote if quotes are shown.
    pub fn advance(&mut self, show_quotes: bool) -> Option<Quote> {
        if !show_quotes {
            return None;
        }
        self.index = (self.index + 1) % QUOTES.len();
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_quote() {
        assert_eq!(QuoteTicker::default().current(), QUOTES[0]);
    }

    #[test]
    fn advance_wraps_around() {
        let mut ticker = QuoteTicker::default();
        for expected in QUOTES.iter().skip(1) {
            assert_eq!(ticker.advance(true), Some(*expected));
        }
        assert_eq!(ticker.advance(true), Some(QUOTES[0]));
    }

    #[test]
    fn hidden_quotes_hold_their_place() {
        let mut ticker = QuoteTicker::default();
        ticker.advance(true);
        assert_eq!(ticker.advance(false), None);
        assert_eq!(ticker.advance(false), None);
        assert_eq!(ticker.current(), QUOTES[1]);
        assert_eq!(ticker.advance(true), Some(QUOTES[2]));
    }
}
