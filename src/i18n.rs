// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User-visible text in English and Czech.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const LOCALE_ENV: &str = "GASEARCH_LOCALE";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Cs,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::En => "en",
            Self::Cs => "cs",
        })
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts `en`/`cs` and POSIX-style tags such as `cs_CZ.UTF-8` or `en-US`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let lang = tag
            .split(|ch: char| ch == '_' || ch == '-' || ch == '.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" | "c" | "posix" => Ok(Self::En),
            "cs" | "cz" => Ok(Self::Cs),
            _ => Err(tag.to_owned()),
        }
    }
}

impl Locale {
    /// Picks a locale: explicit choice first, then `GASEARCH_LOCALE`, then a Czech `LANG`.
    pub fn resolve(
        explicit: Option<Locale>,
        override_tag: Option<&str>,
        lang: Option<&str>,
    ) -> Self {
        if let Some(locale) = explicit {
            return locale;
        }
        if let Some(tag) = override_tag {
            match tag.parse() {
                Ok(locale) => return locale,
                Err(tag) => log::warn!("ignoring unknown {LOCALE_ENV}={tag:?}"),
            }
        }
        match lang.map(str::parse::<Locale>) {
            Some(Ok(Self::Cs)) => Self::Cs,
            _ => Self::En,
        }
    }

    pub fn from_env(explicit: Option<Locale>) -> Self {
        let override_tag = std::env::var(LOCALE_ENV).ok();
        let lang = std::env::var("LANG").ok();
        Self::resolve(explicit, override_tag.as_deref(), lang.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    StorageWarning,
    FinalAttempt,
    SelectionRequired,
    ContextNotSubmittable,
    RightAnswer,
    WrongAnswer,
    StorageRetry,
    Search,
    Next,
    Similar,
    Clear,
    Skip,
    Target,
    TopClasses,
    Finished,
}

/// Text lookup for one locale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn text(&self, key: MessageKey) -> &'static str {
        match self.locale {
            Locale::En => english(key),
            Locale::Cs => czech(key),
        }
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::StorageWarning => "Session storage is unavailable! Enable it, then reload.",
        MessageKey::FinalAttempt => "Last search before displaying a new search image.",
        MessageKey::SelectionRequired => "Some image must be chosen.",
        MessageKey::ContextNotSubmittable => "Context of an image can't be sent.",
        MessageKey::RightAnswer => "Right answer. A new image will be shown.",
        MessageKey::WrongAnswer => "Wrong answer. Try again.",
        MessageKey::StorageRetry => "Session storage failed. Retry?",
        MessageKey::Search => "Search",
        MessageKey::Next => "Next",
        MessageKey::Similar => "Similar",
        MessageKey::Clear => "Clear",
        MessageKey::Skip => "Skip",
        MessageKey::Target => "Searched image",
        MessageKey::TopClasses => "Top classes",
        MessageKey::Finished => "All images were searched. Thank you!",
    }
}

fn czech(key: MessageKey) -> &'static str {
    match key {
        MessageKey::StorageWarning => {
            "Úložiště relace není dostupné! Povolte ho a načtěte stránku znovu."
        }
        MessageKey::FinalAttempt => "Poslední dotaz před zobrazením dalšího hledaného snímku.",
        MessageKey::SelectionRequired => "Musí být vybrán nějaký snímek.",
        MessageKey::ContextNotSubmittable => "Kontext snímku nemůže být odeslán.",
        MessageKey::RightAnswer => "Správná odpověď. Nový hledaný snímek bude zobrazen.",
        MessageKey::WrongAnswer => "Špatná odpověď. Zkuste to znovu.",
        MessageKey::StorageRetry => "Uložení relace selhalo. Zkusit znovu?",
        MessageKey::Search => "Hledat",
        MessageKey::Next => "Další",
        MessageKey::Similar => "Podobné",
        MessageKey::Clear => "Smazat",
        MessageKey::Skip => "Přeskočit",
        MessageKey::Target => "Hledaný snímek",
        MessageKey::TopClasses => "Nejčastější třídy",
        MessageKey::Finished => "Všechny snímky byly vyhledány. Děkujeme!",
    }
}
