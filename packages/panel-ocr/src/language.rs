use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::EngineKind;

/// The closed set of source languages a page can be read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    English,
    Japanese,
    Korean,
    Chinese,
    French,
    Spanish,
    Italian,
    German,
    Dutch,
    Russian,
}

/// Order in which regions on the same row are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingDirection {
    LeftToRight,
    RightToLeft,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Japanese,
        Language::Korean,
        Language::Chinese,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::German,
        Language::Dutch,
        Language::Russian,
    ];

    /// Human readable name, as accepted by [`Language::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::German => "German",
            Language::Dutch => "Dutch",
            Language::Russian => "Russian",
        }
    }

    /// Two letter language code attached to regions before recognition.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::German => "de",
            Language::Dutch => "nl",
            Language::Russian => "ru",
        }
    }

    /// Engine family used for this language unless a registry overrides the route.
    pub fn engine_kind(self) -> EngineKind {
        match self {
            Language::Japanese => EngineKind::Manga,
            Language::Korean => EngineKind::Pororo,
            Language::Chinese => EngineKind::Paddle,
            _ => EngineKind::Document,
        }
    }

    pub fn reading_direction(self) -> ReadingDirection {
        match self {
            Language::Japanese => ReadingDirection::RightToLeft,
            _ => ReadingDirection::LeftToRight,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not one of the supported languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = Language::ALL.map(Language::name).join(", ");
        write!(
            f,
            "unsupported language '{}', supported languages: {}",
            self.0, names
        )
    }
}

impl std::error::Error for UnsupportedLanguage {}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == s)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}
