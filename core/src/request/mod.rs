//! Query parameter builders, one per endpoint family.
//!
//! # Design
//! Builders use `&mut self` setters returning `&mut Self`, so a failed
//! setter (see `PropertiesListRequest::per_page`) leaves the builder as it
//! was. Projection to `Params` goes through the `QueryParams` trait; it is
//! pure and emits only fields that were set, plus each builder's mandatory
//! defaults.

mod i18n;
mod locations;
mod properties_list;

pub use i18n::I18nRequest;
pub use locations::LocationsRequest;
pub use properties_list::PropertiesListRequest;

use crate::error::ApiError;
use crate::http::Params;

/// Projection of a builder to the flat parameter map sent to the API.
pub trait QueryParams {
    fn to_params(&self) -> Result<Params, ApiError>;
}

/// Join language codes with the pipe separator the API expects.
///
/// No deduplication, no filtering: `["fr", "", "en"]` becomes `"fr||en"`.
pub(crate) fn join_langs<I, S>(langs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    langs
        .into_iter()
        .map(|lang| lang.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_langs_keeps_empty_segments_and_duplicates() {
        assert_eq!(join_langs(["fr", "", "en"]), "fr||en");
        assert_eq!(join_langs(["de", "de"]), "de|de");
        assert_eq!(join_langs([" it "]), " it ");
    }

    #[test]
    fn join_langs_of_nothing_is_empty() {
        assert_eq!(join_langs(Vec::<String>::new()), "");
    }
}
