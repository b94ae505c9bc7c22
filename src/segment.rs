// ABOUTME: Text segmentation for mixed-font slide text
// ABOUTME: Splits a string into styled runs by underline trigger words and math-token spans

use log::warn;
use regex::Regex;
use std::sync::OnceLock;

/// Which of the two font families a run is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontClass {
    Math,
    Prose,
}

/// A contiguous span of text sharing one font class and underline state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub font_class: FontClass,
    pub underlined: bool,
}

/// Character class rendered in the math font.
pub const MATH_TOKEN_PATTERN: &str = r"[A-Za-z0-9+\-=°():]+";

static MATH_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn math_token_regex() -> &'static Regex {
    MATH_TOKEN_REGEX.get_or_init(|| Regex::new(MATH_TOKEN_PATTERN).unwrap())
}

/// Splits text into styled runs. Built once per deck and reused for every string.
#[derive(Debug, Clone)]
pub struct Segmenter {
    triggers: Vec<String>,
    trigger_re: Option<Regex>,
}

impl Segmenter {
    /// Create a segmenter that underlines every literal occurrence of `triggers`.
    ///
    /// Empty trigger strings are ignored. Triggers are tried in the given order at each
    /// position, so an earlier trigger wins over a later one that starts at the same place.
    pub fn new<S: AsRef<str>>(triggers: &[S]) -> Self {
        let triggers: Vec<String> = triggers
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let trigger_re = if triggers.is_empty() {
            None
        } else {
            let alternation = triggers
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<String>>()
                .join("|");
            match Regex::new(&alternation) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Underline triggers ignored: {}", e);
                    None
                }
            }
        };

        Self {
            triggers,
            trigger_re,
        }
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Segment `text` into runs whose concatenation is exactly `text`.
    pub fn segment(&self, text: &str) -> Vec<StyledRun> {
        let mut runs = Vec::new();
        if text.is_empty() {
            return runs;
        }

        for piece in capturing_split(self.trigger_re.as_ref(), text) {
            let underlined = self.triggers.iter().any(|t| t == piece.text);
            for sub in capturing_split(Some(math_token_regex()), piece.text) {
                runs.push(StyledRun {
                    text: sub.text.to_string(),
                    font_class: if sub.matched {
                        FontClass::Math
                    } else {
                        FontClass::Prose
                    },
                    underlined,
                });
            }
        }

        runs
    }
}

struct Piece<'a> {
    text: &'a str,
    matched: bool,
}

/// Split `text` around every match of `re`, keeping the matches. Empty pieces are dropped.
fn capturing_split<'a>(re: Option<&Regex>, text: &'a str) -> Vec<Piece<'a>> {
    let Some(re) = re else {
        return vec![Piece {
            text,
            matched: false,
        }];
    };

    let mut pieces = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            pieces.push(Piece {
                text: &text[last..m.start()],
                matched: false,
            });
        }
        if !m.as_str().is_empty() {
            pieces.push(Piece {
                text: m.as_str(),
                matched: true,
            });
        }
        last = m.end();
    }
    if last < text.len() {
        pieces.push(Piece {
            text: &text[last..],
            matched: false,
        });
    }
    pieces
}
