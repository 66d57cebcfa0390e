//! Provider-shaped records and their conversion into domain projections.
//!
//! # Design
//! Every response shape the client relies on has an explicit schema here,
//! including the irregular ones (`data[0].Addresses` for settlement search,
//! `ContactPerson.data[0]` for counterparty creation). Decoding a row that
//! does not fit its schema yields `ApiError::Decode` instead of a missing
//! field surfacing somewhere deep in a caller.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::Language;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    City, CreatedAddress, CreatedCounterparty, Settlement, ShipmentConfirmation, Street,
    TrackingStatus, Warehouse,
};

pub(crate) fn decode_row<T: DeserializeOwned>(row: Value) -> ApiResult<T> {
    serde_json::from_value(row).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> ApiResult<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}

/// Decode the first row; the provider returns single-row data for saves.
pub(crate) fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> ApiResult<T> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Decode("expected at least one row".to_string()))?;
    decode_row(row)
}

/// Pick the description matching `language`, falling back to the
/// language-neutral `Description` field. Empty strings count as missing.
fn localized(
    language: Language,
    base: Option<String>,
    ua: Option<String>,
    ru: Option<String>,
) -> Option<String> {
    let present = |s: Option<String>| s.filter(|s| !s.is_empty());
    match language {
        Language::Ua => present(ua).or_else(|| present(base)),
        Language::Ru => present(ru).or_else(|| present(base)),
    }
}

fn missing_description(what: &str, ref_id: &str) -> ApiError {
    ApiError::Decode(format!("{what} {ref_id} has no description"))
}

/// Accept both `"12"` and `12` for identifier-like fields.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accept both `"55.5"` and `55.5` for money fields.
fn float_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range")),
        Value::String(s) => s.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected number or string, got {other}"
        ))),
    }
}

fn optional_float_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        other => float_or_string(other).map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCity {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "DescriptionUA")]
    description_ua: Option<String>,
    #[serde(rename = "DescriptionRu", alias = "DescriptionRU")]
    description_ru: Option<String>,
    #[serde(rename = "AreaDescription")]
    area_description: Option<String>,
    #[serde(rename = "AreaDescriptionRu")]
    area_description_ru: Option<String>,
}

impl RawCity {
    pub(crate) fn into_city(self, language: Language) -> ApiResult<City> {
        let city_name = localized(
            language,
            self.description,
            self.description_ua,
            self.description_ru,
        )
        .ok_or_else(|| missing_description("city", &self.ref_id))?;
        let area = localized(language, self.area_description, None, self.area_description_ru);
        Ok(City {
            ref_id: self.ref_id,
            city_name,
            area,
        })
    }
}

/// `searchSettlements` wraps its matches one level down: `data[0].Addresses`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSettlementSearch {
    #[serde(rename = "Addresses", default)]
    pub(crate) addresses: Vec<RawSettlement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawSettlement {
    #[serde(rename = "Ref")]
    ref_id: String,
    delivery_city: String,
    main_description: String,
    #[serde(default)]
    area: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    present: String,
}

impl From<RawSettlement> for Settlement {
    fn from(raw: RawSettlement) -> Self {
        Self {
            ref_id: raw.ref_id,
            delivery_city_ref: raw.delivery_city,
            city_name: raw.main_description,
            area: raw.area,
            region: raw.region,
            present: raw.present,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStreet {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "StreetsType", default)]
    streets_type: String,
}

impl From<RawStreet> for Street {
    fn from(raw: RawStreet) -> Self {
        Self {
            ref_id: raw.ref_id,
            name: raw.description,
            street_type: raw.streets_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWarehouse {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "Number", deserialize_with = "string_or_number")]
    number: String,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "DescriptionUA")]
    description_ua: Option<String>,
    #[serde(rename = "DescriptionRu", alias = "DescriptionRU")]
    description_ru: Option<String>,
    #[serde(rename = "CityRef", default)]
    city_ref: String,
}

impl RawWarehouse {
    pub(crate) fn into_warehouse(self, language: Language) -> ApiResult<Warehouse> {
        let name = localized(
            language,
            self.description,
            self.description_ua,
            self.description_ru,
        )
        .ok_or_else(|| missing_description("warehouse", &self.ref_id))?;
        Ok(Warehouse {
            ref_id: self.ref_id,
            number: self.number,
            name,
            city_ref: self.city_ref,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawRef {
    #[serde(rename = "Ref")]
    ref_id: String,
}

#[derive(Debug, Deserialize)]
struct RawNested<T> {
    data: Vec<T>,
}

/// `Counterparty.save` returns the contact person nested as
/// `ContactPerson.data[0].Ref`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCounterparty {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "ContactPerson")]
    contact_person: RawNested<RawRef>,
}

impl TryFrom<RawCounterparty> for CreatedCounterparty {
    type Error = ApiError;

    fn try_from(raw: RawCounterparty) -> ApiResult<Self> {
        let contact = raw.contact_person.data.into_iter().next().ok_or_else(|| {
            ApiError::Decode(format!("counterparty {} has no contact person", raw.ref_id))
        })?;
        Ok(Self {
            ref_id: raw.ref_id,
            contact_person_ref: contact.ref_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAddress {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "Description", default)]
    description: String,
}

impl From<RawAddress> for CreatedAddress {
    fn from(raw: RawAddress) -> Self {
        Self {
            ref_id: raw.ref_id,
            description: raw.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawTrackingStatus {
    #[serde(deserialize_with = "string_or_number")]
    number: String,
    #[serde(default)]
    status: String,
    #[serde(deserialize_with = "string_or_number")]
    status_code: String,
    #[serde(default)]
    warehouse_recipient: Option<String>,
    #[serde(default)]
    scheduled_delivery_date: Option<String>,
}

impl From<RawTrackingStatus> for TrackingStatus {
    fn from(raw: RawTrackingStatus) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            number: raw.number,
            status: raw.status,
            status_code: raw.status_code,
            warehouse_recipient: non_empty(raw.warehouse_recipient),
            scheduled_delivery_date: non_empty(raw.scheduled_delivery_date),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSavedDocument {
    #[serde(rename = "Ref")]
    ref_id: String,
    #[serde(rename = "IntDocNumber", deserialize_with = "string_or_number")]
    int_doc_number: String,
    #[serde(rename = "CostOnSite", default, deserialize_with = "optional_float_or_string")]
    cost_on_site: Option<f64>,
}

impl From<RawSavedDocument> for ShipmentConfirmation {
    fn from(raw: RawSavedDocument) -> Self {
        Self {
            tracking_number: raw.int_doc_number,
            document_ref: raw.ref_id,
            estimated_cost: raw.cost_on_site,
        }
    }
}
