//! Auto-numbered bullets.
//!
//! Numbers are assigned in a pass over every auto-numbered marker of one
//! text body, in document order. The state is a stack of frames, one per
//! open `(kind, level)` sequence:
//!
//! * first marker: push a frame counting from 1
//! * same kind and level as the top frame: increment it
//! * different kind at the same level: push a fresh frame
//! * deeper level: push a fresh frame
//! * shallower level: pop one frame and continue from the popped counter + 1
//!
//! A different kind at the same level starts a new sequence; the counter of
//! the sequence it interrupts is not restored later.

/// One open numbering sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    counter: u32,
    kind: String,
    level: u32,
}

/// Numbering state of one text body.
#[derive(Debug, Default)]
pub struct NumberingState {
    stack: Vec<Frame>,
}

impl NumberingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Running counter for the next marker of `kind` at `level`.
    pub fn next(&mut self, kind: &str, level: u32) -> u32 {
        let Some(top) = self.stack.last_mut() else {
            return self.push(kind, level, 1);
        };

        if level == top.level {
            if top.kind == kind {
                top.counter += 1;
                top.counter
            } else {
                self.push(kind, level, 1)
            }
        } else if level > top.level {
            self.push(kind, level, 1)
        } else {
            let popped = self.stack.pop().map(|f| f.counter).unwrap_or(0);
            match self.stack.last_mut() {
                Some(frame) => {
                    frame.counter = popped + 1;
                    frame.kind = kind.to_string();
                    frame.level = level;
                    frame.counter
                }
                None => self.push(kind, level, popped + 1),
            }
        }
    }

    fn push(&mut self, kind: &str, level: u32, counter: u32) -> u32 {
        self.stack.push(Frame {
            counter,
            kind: kind.to_string(),
            level,
        });
        counter
    }
}

/// Format a numeral for a `buAutoNum@type` scheme.
///
/// Unknown schemes render as `arabicPeriod`.
pub fn format_number(scheme: &str, n: u32) -> String {
    let (body, style) = split_scheme(scheme);
    let numeral = match body {
        "arabic" => n.to_string(),
        "alphaLc" => alpha(n).to_lowercase(),
        "alphaUc" => alpha(n),
        "romanLc" => roman(n).to_lowercase(),
        "romanUc" => roman(n),
        "hebrew2" => return format!("{}-", hebrew(n)),
        "arabic1" | "arabic2" => return format!("{}-", arabic_indic(n)),
        _ => {
            log::debug!("numbering scheme {} rendered as arabicPeriod", scheme);
            return format!("{}.", n);
        }
    };

    match style {
        "Period" => format!("{}.", numeral),
        "ParenR" => format!("{})", numeral),
        "ParenBoth" => format!("({})", numeral),
        "Minus" => format!("{}-", numeral),
        _ => numeral,
    }
}

fn split_scheme(scheme: &str) -> (&str, &str) {
    for suffix in ["ParenBoth", "ParenR", "Period", "Plain", "Minus"] {
        if let Some(body) = scheme.strip_suffix(suffix) {
            return (body, suffix);
        }
    }
    (scheme, "")
}

/// `A..Z`, then `AA..ZZ`, then `AAA..` as PowerPoint does.
fn alpha(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let letter = (b'A' + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(repeat).collect()
}

fn roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// Hebrew numeral letters (gematria), valid below 1000.
fn hebrew(n: u32) -> String {
    const ONES: [char; 9] = ['א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט'];
    const TENS: [char; 9] = ['י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ'];
    const HUNDREDS: [char; 4] = ['ק', 'ר', 'ש', 'ת'];

    let mut out = String::new();
    let mut rest = n % 1000;
    while rest >= 400 {
        out.push('ת');
        rest -= 400;
    }
    if rest >= 100 {
        out.push(HUNDREDS[(rest / 100 - 1) as usize]);
        rest %= 100;
    }
    // 15 and 16 avoid spelling divine names
    if rest == 15 || rest == 16 {
        out.push('ט');
        out.push(ONES[(rest - 9) as usize - 1]);
        return out;
    }
    if rest >= 10 {
        out.push(TENS[(rest / 10 - 1) as usize]);
        rest %= 10;
    }
    if rest > 0 {
        out.push(ONES[(rest - 1) as usize]);
    }
    out
}

fn arabic_indic(n: u32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_levels_and_kinds() {
        let mut state = NumberingState::new();
        let markers = [
            ("bullet", 1),
            ("bullet", 1),
            ("number", 1),
            ("bullet", 2),
            ("bullet", 2),
            ("bullet", 1),
        ];
        let counters: Vec<u32> = markers
            .iter()
            .map(|(kind, level)| state.next(kind, *level))
            .collect();
        assert_eq!(counters, vec![1, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_simple_sequence() {
        let mut state = NumberingState::new();
        let counters: Vec<u32> = (0..4).map(|_| state.next("arabicPeriod", 0)).collect();
        assert_eq!(counters, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_to_empty_stack() {
        let mut state = NumberingState::new();
        assert_eq!(state.next("arabicPeriod", 2), 1);
        assert_eq!(state.next("arabicPeriod", 2), 2);
        assert_eq!(state.next("arabicPeriod", 0), 3);
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_number("arabicPeriod", 3), "3.");
        assert_eq!(format_number("arabicParenR", 3), "3)");
        assert_eq!(format_number("arabicParenBoth", 3), "(3)");
        assert_eq!(format_number("arabicPlain", 3), "3");
        assert_eq!(format_number("alphaLcPeriod", 2), "b.");
        assert_eq!(format_number("alphaUcParenR", 28), "BB)");
        assert_eq!(format_number("romanLcPeriod", 14), "xiv.");
        assert_eq!(format_number("romanUcPeriod", 1994), "MCMXCIV.");
        assert_eq!(format_number("hebrew2Minus", 1), "א-");
        assert_eq!(format_number("hebrew2Minus", 15), "טו-");
        assert_eq!(format_number("arabic1Minus", 12), "١٢-");
        assert_eq!(format_number("circleNumDbPlain", 5), "5.");
    }
}
