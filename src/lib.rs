// ABOUTME: Library module for the quiz-slides program.
// ABOUTME: Contains the loader, text segmenter, slide composer and PPTX writer.

// Reexport modules
pub mod compose;
pub mod config;
pub mod deck;
pub mod errors;
pub mod media;
pub mod pptx;
pub mod problem;
pub mod segment;
pub mod units;
pub mod utils;

// Reexport common types and functions
pub use compose::{
    Composer, DeckObserver, DeckReport, RunOutcome, SlideSummary, generate_deck,
    generate_deck_observed, run,
};
pub use config::{Config, LayoutConfig};
pub use deck::Presentation;
pub use errors::{ImageWarning, Result, SlideError};
pub use pptx::write_pptx;
pub use problem::{ProblemRecord, load_problems, parse_problems};
pub use segment::{FontClass, Segmenter, StyledRun};
