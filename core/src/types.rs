//! Domain types: operation inputs and the projections returned to callers.
//!
//! # Design
//! Projections are shaped for callers, not for the provider. They use
//! camelCase field names on the wire (`ref`, `cityName`, `number`) and never
//! carry the provider's capitalized keys. Provider-shaped records live in the
//! private `wire` module and are converted into these types there.

use serde::{Deserialize, Serialize};

/// A city as returned by `Address.getCities`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub city_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// A settlement match from `Address.searchSettlements`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    #[serde(rename = "ref")]
    pub ref_id: String,
    /// City ref usable with warehouse and street lookups.
    pub delivery_city_ref: String,
    pub city_name: String,
    pub area: String,
    pub region: String,
    /// Full human-readable label, e.g. "м. Київ, Київська обл.".
    pub present: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Street {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub name: String,
    pub street_type: String,
}

/// A branch or parcel locker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub number: String,
    pub name: String,
    pub city_ref: String,
}

/// Personal data for a private-person recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Street-level address attached to a counterparty.
///
/// Either `street_ref` or `find_by_string` identifies the street; the other
/// is sent as an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street_ref: Option<String>,
    pub find_by_string: Option<String>,
    pub building_number: String,
    pub flat: String,
}

/// Result of registering a recipient counterparty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCounterparty {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub contact_person_ref: String,
}

/// Result of attaching an address to a counterparty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAddress {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatus {
    pub number: String,
    pub status: String,
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_delivery_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceType {
    WarehouseWarehouse,
    WarehouseDoors,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::WarehouseWarehouse => "WarehouseWarehouse",
            ServiceType::WarehouseDoors => "WarehouseDoors",
        }
    }
}

/// One seat of a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParcelDetail {
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Recipient settlement, usually taken from a `Settlement` lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientCity {
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub name: String,
    pub area: String,
    pub region: String,
}

impl From<&Settlement> for RecipientCity {
    fn from(settlement: &Settlement) -> Self {
        Self {
            ref_id: settlement.delivery_city_ref.clone(),
            name: settlement.city_name.clone(),
            area: settlement.area.clone(),
            region: settlement.region.clone(),
        }
    }
}

/// Where the parcel is delivered.
///
/// Branch delivery reads `address_name` (the warehouse number or address as
/// the provider displays it); door delivery reads the street fields. Fields
/// the chosen service type does not use are ignored and nothing is checked
/// locally: the provider rejects incomplete payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipientAddress {
    pub address_name: String,
    pub street_ref: String,
    pub building_number: String,
    pub flat: String,
}

impl RecipientAddress {
    pub fn warehouse(address_name: impl Into<String>) -> Self {
        Self {
            address_name: address_name.into(),
            ..Self::default()
        }
    }

    pub fn doors(
        street_ref: impl Into<String>,
        building_number: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        Self {
            street_ref: street_ref.into(),
            building_number: building_number.into(),
            flat: flat.into(),
            ..Self::default()
        }
    }
}

/// Everything needed to create an Internet Document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    pub order_id: String,
    pub description: String,
    pub details: Vec<ParcelDetail>,
    pub service_type: ServiceType,
    /// `false` means payment is collected on delivery.
    pub paid: bool,
    pub total_price: f64,
    #[serde(default)]
    pub edrpou: Option<String>,

    pub city_sender: String,
    pub sender_ref: String,
    /// Sender's warehouse (the sender address).
    pub warehouse_ref: String,
    pub contact_ref: String,
    pub sender_phone: String,

    pub recipient_name: String,
    pub recipient_patronymic: String,
    pub recipient_surname: String,
    pub recipient_phone: String,
    pub recipient_city: RecipientCity,
    pub recipient_address: RecipientAddress,
}

/// What the provider returns for a saved Internet Document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentConfirmation {
    pub tracking_number: String,
    pub document_ref: String,
    /// `None` when the provider omits `CostOnSite`; the document exists either way.
    pub estimated_cost: Option<f64>,
}
