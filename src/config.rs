// ABOUTME: Configuration module for the quiz-slides application
// ABOUTME: Provides run settings, environment variable handling and the slide layout constants

use crate::units::{Emu, FontSize, Rect, Rgb, cm, inches};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "problems_data.json";
pub const DEFAULT_OUTPUT: &str = "수학_문제_슬라이드_결과.pptx";

/// Global configuration for a run
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Base directory for relative picture paths. `None` resolves against the working directory.
    pub image_dir: Option<PathBuf>,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            image_dir: None,
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(input) = env_path("QUIZ_SLIDES_INPUT") {
            config.input_path = input;
        }
        if let Some(output) = env_path("QUIZ_SLIDES_OUTPUT") {
            config.output_path = output;
        }
        config.image_dir = env_path("QUIZ_SLIDES_IMAGE_DIR");
        config
    }

    /// Apply command-line overrides on top of this config
    pub fn with_overrides(
        mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        image_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(input) = input {
            self.input_path = input;
        }
        if let Some(output) = output {
            self.output_path = output;
        }
        if image_dir.is_some() {
            self.image_dir = image_dir;
        }
        self
    }
}

/// A non-empty path from the environment.
fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Styling shared by every run placed in one text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: FontSize,
    pub color: Rgb,
    pub bold: bool,
}

/// Position and styling of one fixed text box in the template.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub rect: Rect,
    pub style: TextStyle,
}

/// Choice boxes share left, width and style; their tops come from the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceLayout {
    pub left: Emu,
    pub width: Emu,
    pub height: Emu,
    pub spacing: Emu,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayout {
    pub left: Emu,
    pub max_width: Emu,
    pub max_height: Emu,
}

/// Every constant of the slide template.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub slide_width: Emu,
    pub slide_height: Emu,
    pub background: Rgb,
    pub prose_font: String,
    pub math_font: String,
    pub underline_words: Vec<String>,
    pub title: BoxLayout,
    pub number: BoxLayout,
    /// `rect.height` is the minimum; the box grows with its text.
    pub question: BoxLayout,
    /// Gap between the question box and whatever follows it.
    pub question_gap: Emu,
    pub choices: ChoiceLayout,
    pub image: ImageLayout,
    pub deck_title: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let accent = Rgb::CYAN;
        let text = Rgb::WHITE;
        Self {
            slide_width: cm(33.867),
            slide_height: cm(19.05),
            background: Rgb::BLACK,
            prose_font: "나눔스퀘어라운드 ExtraBold".to_string(),
            math_font: "BT수식M".to_string(),
            underline_words: vec!["잘못".to_string(), "않은".to_string(), "않는".to_string()],
            title: BoxLayout {
                rect: Rect::new(cm(1.5), cm(1.0), cm(20.0), cm(1.5)),
                style: TextStyle {
                    size: FontSize(32.0),
                    color: accent,
                    bold: true,
                },
            },
            number: BoxLayout {
                rect: Rect::new(cm(1.5), cm(3.5), cm(1.5), cm(1.5)),
                style: TextStyle {
                    size: FontSize(32.0),
                    color: accent,
                    bold: true,
                },
            },
            question: BoxLayout {
                rect: Rect::new(cm(3.5), cm(3.5), cm(25.0), cm(2.0)),
                style: TextStyle {
                    size: FontSize(28.0),
                    color: text,
                    bold: false,
                },
            },
            question_gap: cm(0.5),
            choices: ChoiceLayout {
                left: cm(3.5),
                width: cm(30.0),
                height: inches(0.5),
                spacing: inches(0.1),
                style: TextStyle {
                    size: FontSize(24.0),
                    color: text,
                    bold: false,
                },
            },
            image: ImageLayout {
                left: cm(4.0),
                max_width: cm(15.0),
                max_height: cm(10.0),
            },
            deck_title: "Quiz Slides".to_string(),
        }
    }
}
