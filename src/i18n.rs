// SPDX-License-Identifier: MPL-2.0

//! Localized user-facing text.
//!
//! Messages live in Fluent files under `i18n/<locale>/desktop_clock.ftl` and
//! are embedded into the binary. English is the fallback; German ships too.
//!
//! ```rust,ignore
//! use crate::fl;
//!
//! let title = fl!("update-available-title");
//! let text = fl!("up-to-date", current = "1.2.0");
//! ```

use std::sync::LazyLock;

use i18n_embed::{
    DefaultLocalizer, LanguageLoader, Localizer,
    fluent::{FluentLanguageLoader, fluent_language_loader},
    unic_langid::LanguageIdentifier,
};
use rust_embed::RustEmbed;

/// Select the best available translation for `requested_languages`.
///
/// Called once at startup with the desktop's preferred languages.
pub fn init(requested_languages: &[LanguageIdentifier]) {
    if let Err(why) = localizer().select(requested_languages) {
        log::error!("error while loading fluent localizations: {why}");
    }
}

#[must_use]
pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

/// Global loader. English is loaded on first access so lookups never come
/// back empty before [`init`] runs.
pub static LANGUAGE_LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    if let Err(err) = loader.load_fallback_language(&Localizations) {
        log::error!("Error while loading fallback language: {err}");
    }
    // Plain terminal output, no bidi isolation marks
    loader.set_use_isolating(false);

    loader
});

/// Request a localized string by ID.
///
/// An unknown ID is a compile error; a missing translation falls back to
/// English.
#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}
