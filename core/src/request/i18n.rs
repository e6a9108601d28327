use serde_json::Value;

use super::{join_langs, QueryParams};
use crate::error::ApiError;
use crate::http::Params;

/// Language parameters for the label endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct I18nRequest {
    lang: Option<String>,
}

impl I18nRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content languages in lower case (fr, en, it, de), pipe-joined.
    pub fn lang<I, S>(&mut self, langs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lang = Some(join_langs(langs));
        self
    }
}

impl QueryParams for I18nRequest {
    fn to_params(&self) -> Result<Params, ApiError> {
        let lang = self.lang.clone().ok_or(ApiError::MissingField("lang"))?;

        let mut params = Params::new();
        params.insert("lang".to_string(), Value::String(lang));
        Ok(params)
    }
}
