// ABOUTME: Slide composer for the quiz-slides application
// ABOUTME: Lays out one slide per problem record and drives a whole deck build

use crate::config::{Config, LayoutConfig, TextStyle};
use crate::deck::{Alignment, Anchor, Picture, Presentation, Slide, TextBox, TextRun};
use crate::errors::{ImageWarning, Result};
use crate::media::{fit_image, load_media};
use crate::problem::{ProblemRecord, load_problems};
use crate::pptx::write_pptx;
use crate::segment::{FontClass, Segmenter};
use crate::units::{Emu, Rect};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Lays records out on the fixed slide template.
pub struct Composer<'a> {
    layout: &'a LayoutConfig,
    segmenter: Segmenter,
    image_dir: Option<PathBuf>,
}

impl<'a> Composer<'a> {
    pub fn new(layout: &'a LayoutConfig) -> Self {
        Self {
            layout,
            segmenter: Segmenter::new(layout.underline_words.as_slice()),
            image_dir: None,
        }
    }

    /// Resolve relative picture paths against `dir` instead of the working directory.
    pub fn with_image_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.image_dir = dir;
        self
    }

    pub fn new_presentation(&self) -> Presentation {
        Presentation::new(
            &self.layout.deck_title,
            self.layout.slide_width,
            self.layout.slide_height,
        )
    }

    /// Append exactly one slide for `record`. Picture problems are returned, not raised.
    pub fn compose(&self, deck: &mut Presentation, record: &ProblemRecord) -> Vec<ImageWarning> {
        let layout = self.layout;
        let slide = deck.add_slide(layout.background);

        let mut title = TextBox::new(layout.title.rect);
        self.fill_runs(&mut title, &record.slide_title, &layout.title.style);
        slide.add_text_box(title);

        let mut number = TextBox::new(layout.number.rect);
        number.alignment = Some(Alignment::Center);
        number.anchor = Anchor::Middle;
        self.fill_runs(&mut number, &record.number, &layout.number.style);
        slide.add_text_box(number);

        let mut question = TextBox::new(layout.question.rect);
        question.word_wrap = true;
        self.fill_runs(&mut question, &record.question, &layout.question.style);
        question.grow_to_fit(layout.question.rect.height);
        let mut cursor: Emu = question.rect.bottom() + layout.question_gap;
        slide.add_text_box(question);

        let choices = &layout.choices;
        for choice in &record.choices {
            let mut choice_box =
                TextBox::new(Rect::new(choices.left, cursor, choices.width, choices.height));
            self.fill_runs(&mut choice_box, choice, &choices.style);
            slide.add_text_box(choice_box);
            cursor += choices.height + choices.spacing;
        }

        let mut warnings = Vec::new();
        if let Some(picture) = &record.included_picture {
            if let Err(warning) = self.place_picture(slide, record, picture, cursor) {
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        warnings
    }

    fn fill_runs(&self, text_box: &mut TextBox, text: &str, style: &TextStyle) {
        text_box.runs = self
            .segmenter
            .segment(text)
            .into_iter()
            .map(|run| TextRun {
                font: match run.font_class {
                    FontClass::Math => self.layout.math_font.clone(),
                    FontClass::Prose => self.layout.prose_font.clone(),
                },
                text: run.text,
                size: style.size,
                color: style.color,
                bold: style.bold,
                underline: run.underlined,
            })
            .collect();
    }

    fn resolve(&self, picture: &str) -> PathBuf {
        let path = Path::new(picture);
        match &self.image_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn place_picture(
        &self,
        slide: &mut Slide,
        record: &ProblemRecord,
        picture: &str,
        top: Emu,
    ) -> std::result::Result<(), ImageWarning> {
        let path = self.resolve(picture);
        if !path.exists() {
            return Err(ImageWarning::NotFound {
                number: record.number.clone(),
                path,
            });
        }

        let media = load_media(&path).map_err(|source| ImageWarning::Unreadable {
            number: record.number.clone(),
            path: path.clone(),
            source,
        })?;

        let bounds = &self.layout.image;
        let (width, height) = fit_image(
            media.pixel_width,
            media.pixel_height,
            bounds.max_width,
            bounds.max_height,
        );
        slide.add_picture(Picture {
            rect: Rect::new(bounds.left, top, width, height),
            media,
            description: picture.to_string(),
        });
        Ok(())
    }
}

/// What happened to one slide.
#[derive(Debug)]
pub struct SlideSummary {
    pub index: usize,
    pub number: String,
    pub warnings: Vec<ImageWarning>,
}

/// Outcome of a deck build.
#[derive(Debug)]
pub struct DeckReport {
    pub output_path: PathBuf,
    pub slides: Vec<SlideSummary>,
}

impl DeckReport {
    pub fn warning_count(&self) -> usize {
        self.slides.iter().map(|s| s.warnings.len()).sum()
    }
}

/// Receives progress while a deck is built. Both hooks run before anything is written.
pub trait DeckObserver {
    fn started(&mut self, _slide_count: usize) {}

    fn slide_composed(&mut self, _slide: &SlideSummary) {}
}

/// Silent observer.
impl DeckObserver for () {}

/// Compose every record and write the deck to `output`.
pub fn generate_deck(
    problems: &[ProblemRecord],
    output: &Path,
    layout: &LayoutConfig,
    image_dir: Option<PathBuf>,
) -> Result<DeckReport> {
    generate_deck_observed(problems, output, layout, image_dir, &mut ())
}

/// Like [`generate_deck`], reporting each slide to `observer` as soon as it is composed.
pub fn generate_deck_observed(
    problems: &[ProblemRecord],
    output: &Path,
    layout: &LayoutConfig,
    image_dir: Option<PathBuf>,
    observer: &mut dyn DeckObserver,
) -> Result<DeckReport> {
    info!("Composing {} slides", problems.len());
    observer.started(problems.len());

    let composer = Composer::new(layout).with_image_dir(image_dir);
    let mut deck = composer.new_presentation();
    let mut slides = Vec::with_capacity(problems.len());

    for (i, record) in problems.iter().enumerate() {
        let warnings = composer.compose(&mut deck, record);
        info!("Slide {} composed: problem {}", i + 1, record.number);
        let summary = SlideSummary {
            index: i + 1,
            number: record.number.clone(),
            warnings,
        };
        observer.slide_composed(&summary);
        slides.push(summary);
    }

    write_pptx(&deck, output)?;

    Ok(DeckReport {
        output_path: output.to_path_buf(),
        slides,
    })
}

/// Result of a full run from a config.
#[derive(Debug)]
pub enum RunOutcome {
    Generated(DeckReport),
    /// The input held no records, so nothing was written.
    Empty,
}

/// Load the configured input and build the deck.
pub fn run(config: &Config, observer: &mut dyn DeckObserver) -> Result<RunOutcome> {
    let problems = load_problems(&config.input_path)?;
    if problems.is_empty() {
        info!("No problems in {:?}, nothing to write", config.input_path);
        return Ok(RunOutcome::Empty);
    }

    let report = generate_deck_observed(
        &problems,
        &config.output_path,
        &config.layout,
        config.image_dir.clone(),
        observer,
    )?;
    Ok(RunOutcome::Generated(report))
}
