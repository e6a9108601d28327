use serde_json::Value;

use super::{join_langs, QueryParams};
use crate::error::ApiError;
use crate::http::Params;

/// Parameters for the locations labels endpoint.
///
/// Level toggles are one-way: once set they stay set. ID filters are emitted
/// whenever they were set, `0` included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationsRequest {
    is_country: bool,
    is_canton: bool,
    is_district: bool,
    is_zone: bool,
    is_quarter: bool,
    is_city: bool,
    country_id: Option<i64>,
    canton_id: Option<i64>,
    district_id: Option<i64>,
    zone_id: Option<i64>,
    quarter_id: Option<i64>,
    city_id: Option<i64>,
    lang: Option<String>,
}

impl LocationsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the list of countries.
    pub fn is_country(&mut self) -> &mut Self {
        self.is_country = true;
        self
    }

    /// Retrieve the list of cantons.
    pub fn is_canton(&mut self) -> &mut Self {
        self.is_canton = true;
        self
    }

    /// Retrieve the list of districts.
    pub fn is_district(&mut self) -> &mut Self {
        self.is_district = true;
        self
    }

    /// Retrieve the list of zones.
    pub fn is_zone(&mut self) -> &mut Self {
        self.is_zone = true;
        self
    }

    /// Retrieve the list of quarters.
    pub fn is_quarter(&mut self) -> &mut Self {
        self.is_quarter = true;
        self
    }

    /// Retrieve the list of cities.
    pub fn is_city(&mut self) -> &mut Self {
        self.is_city = true;
        self
    }

    pub fn country_id(&mut self, id: i64) -> &mut Self {
        self.country_id = Some(id);
        self
    }

    pub fn canton_id(&mut self, id: i64) -> &mut Self {
        self.canton_id = Some(id);
        self
    }

    pub fn district_id(&mut self, id: i64) -> &mut Self {
        self.district_id = Some(id);
        self
    }

    pub fn zone_id(&mut self, id: i64) -> &mut Self {
        self.zone_id = Some(id);
        self
    }

    pub fn quarter_id(&mut self, id: i64) -> &mut Self {
        self.quarter_id = Some(id);
        self
    }

    pub fn city_id(&mut self, id: i64) -> &mut Self {
        self.city_id = Some(id);
        self
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

impl QueryParams for LocationsRequest {
    fn to_params(&self) -> Result<Params, ApiError> {
        let lang = self.lang.clone().ok_or(ApiError::MissingField("lang"))?;

        let mut params = Params::new();
        params.insert("lang".to_string(), Value::String(lang));

        let levels = [
            ("is_country", self.is_country),
            ("is_canton", self.is_canton),
            ("is_district", self.is_district),
            ("is_zone", self.is_zone),
            ("is_quarter", self.is_quarter),
            ("is_city", self.is_city),
        ];
        for (key, _) in levels.into_iter().filter(|(_, on)| *on) {
            params.insert(key.to_string(), Value::from(1));
        }

        let filters = [
            ("country_id", self.country_id),
            ("canton_id", self.canton_id),
            ("district_id", self.district_id),
            ("zone_id", self.zone_id),
            ("quarter_id", self.quarter_id),
            ("city_id", self.city_id),
        ];
        for (key, id) in filters {
            if let Some(id) = id {
                params.insert(key.to_string(), Value::from(id));
            }
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(params: &Params) -> Vec<&str> {
        params.keys().map(String::as_str).collect()
    }

    #[test]
    fn only_lang_by_default() {
        let mut req = LocationsRequest::new();
        req.lang(["fr"]);
        assert_eq!(Value::Object(req.to_params().unwrap()), json!({"lang": "fr"}));
    }

    #[test]
    fn missing_lang_is_an_error() {
        let mut req = LocationsRequest::new();
        req.is_city().city_id(4);
        assert!(matches!(req.to_params(), Err(ApiError::MissingField("lang"))));
    }

    #[test]
    fn toggles_follow_declaration_order() {
        let mut req = LocationsRequest::new();
        req.is_city().is_zone().is_country().lang(["en"]);
        let params = req.to_params().unwrap();
        assert_eq!(keys(&params), ["lang", "is_country", "is_zone", "is_city"]);
        assert_eq!(params["is_zone"], 1);
    }

    #[test]
    fn all_fields() {
        let mut req = LocationsRequest::new();
        req.lang(["fr", "de"])
            .is_country()
            .is_canton()
            .is_district()
            .is_zone()
            .is_quarter()
            .is_city()
            .country_id(1)
            .canton_id(2)
            .district_id(3)
            .zone_id(4)
            .quarter_id(5)
            .city_id(6);
        assert_eq!(
            Value::Object(req.to_params().unwrap()),
            json!({
                "lang": "fr|de",
                "is_country": 1,
                "is_canton": 1,
                "is_district": 1,
                "is_zone": 1,
                "is_quarter": 1,
                "is_city": 1,
                "country_id": 1,
                "canton_id": 2,
                "district_id": 3,
                "zone_id": 4,
                "quarter_id": 5,
                "city_id": 6,
            })
        );
    }

    #[test]
    fn zero_filter_is_emitted() {
        let mut req = LocationsRequest::new();
        req.lang(["fr"]).canton_id(0);
        let params = req.to_params().unwrap();
        assert_eq!(params["canton_id"], 0);
        assert!(!params.contains_key("country_id"));
    }

    #[test]
    fn filter_overwrites() {
        let mut req = LocationsRequest::new();
        req.lang(["fr"]).city_id(10).city_id(-3);
        assert_eq!(req.to_params().unwrap()["city_id"], -3);
    }

    #[test]
    fn projection_is_repeatable() {
        let mut req = LocationsRequest::new();
        req.lang(["it"]).is_quarter().zone_id(9);
        assert_eq!(req.to_params().unwrap(), req.to_params().unwrap());
    }
}
