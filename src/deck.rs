// ABOUTME: In-memory presentation model built by the composer
// ABOUTME: Slides hold text boxes with per-run styling and embedded pictures

use crate::media::Media;
use crate::units::{Emu, FontSize, Rect, Rgb};

/// Default left/right text inset of a DrawingML text box (0.1in).
pub const INSET_X: Emu = 91_440;
/// Default top/bottom text inset of a DrawingML text box (0.05in).
pub const INSET_Y: Emu = 45_720;

const LINE_SPACING: f64 = 1.2;
const NARROW_ADVANCE: f64 = 0.55;
const WIDE_ADVANCE: f64 = 1.0;

/// A whole deck, owned by the composer until it is written out.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub title: String,
    pub slide_width: Emu,
    pub slide_height: Emu,
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(title: &str, slide_width: Emu, slide_height: Emu) -> Self {
        Self {
            title: title.to_string(),
            slide_width,
            slide_height,
            slides: Vec::new(),
        }
    }

    /// Append a blank slide with a solid background.
    pub fn add_slide(&mut self, background: Rgb) -> &mut Slide {
        self.slides.push(Slide {
            background,
            shapes: Vec::new(),
        });
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub background: Rgb,
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn add_text_box(&mut self, text_box: TextBox) {
        self.shapes.push(Shape::TextBox(text_box));
    }

    pub fn add_picture(&mut self, picture: Picture) {
        self.shapes.push(Shape::Picture(picture));
    }

    /// Shapes in z-order (first is at the back).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::TextBox(t) => Some(t),
            Shape::Picture(_) => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture(p) => Some(p),
            Shape::TextBox(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Shape {
    TextBox(TextBox),
    Picture(Picture),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

/// One run of text with all of its styling spelled out.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: String,
    pub size: FontSize,
    pub color: Rgb,
    pub bold: bool,
    pub underline: bool,
}

/// A single-paragraph text box. Viewers may resize it to its text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub rect: Rect,
    pub runs: Vec<TextRun>,
    /// `None` keeps the viewer's default (left).
    pub alignment: Option<Alignment>,
    pub anchor: Anchor,
    pub word_wrap: bool,
}

impl TextBox {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            runs: Vec::new(),
            alignment: None,
            anchor: Anchor::Top,
            word_wrap: false,
        }
    }

    /// The plain text of the box.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Grow the box so the estimated text height fits, never shrinking below `min_height`.
    pub fn grow_to_fit(&mut self, min_height: Emu) {
        let needed = estimate_text_height(&self.runs, self.rect.width, self.word_wrap);
        self.rect.height = needed.max(min_height);
    }
}

#[derive(Debug, Clone)]
pub struct Picture {
    pub rect: Rect,
    pub media: Media,
    pub description: String,
}

/// Estimate the rendered height of `runs` in a box of `box_width`.
///
/// Latin characters advance about half an em, everything else a full em. Lines are broken
/// on `\n` and, when `word_wrap` is set, wherever the next character would overflow.
pub fn estimate_text_height(runs: &[TextRun], box_width: Emu, word_wrap: bool) -> Emu {
    let usable = (box_width - 2 * INSET_X).max(1) as f64;
    let mut total = 0.0;
    let mut line_width = 0.0;
    let mut line_size: f64 = 0.0;
    let mut has_line = false;

    for run in runs {
        let size = run.size.emu() as f64;
        for ch in run.text.chars() {
            has_line = true;
            if ch == '\n' {
                total += line_size.max(size) * LINE_SPACING;
                line_width = 0.0;
                line_size = 0.0;
                continue;
            }
            let advance = size
                * if ch.is_ascii() {
                    NARROW_ADVANCE
                } else {
                    WIDE_ADVANCE
                };
            if word_wrap && line_width > 0.0 && line_width + advance > usable {
                total += line_size * LINE_SPACING;
                line_width = 0.0;
                line_size = 0.0;
            }
            line_width += advance;
            line_size = line_size.max(size);
        }
    }

    if has_line {
        total += line_size * LINE_SPACING;
    }

    total.ceil() as Emu + 2 * INSET_Y
}
