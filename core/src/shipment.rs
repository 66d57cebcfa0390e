//! Internet Document creation.
//!
//! The only multi-step operation. Steps run strictly in order and the first
//! failure is returned as-is:
//!
//! 1. derive seat count, total weight, description and ship date;
//! 2. for door delivery, register the recipient counterparty and its street
//!    address, then splice their refs into the payload;
//! 3. attach cash-on-delivery terms when the order is unpaid;
//! 4. save the document.
//!
//! Nothing is rolled back. A door-delivery shipment that fails at the save
//! step leaves the counterparty and address it created on the provider side.

use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Map, Value};

use crate::client::NovaPoshtaClient;
use crate::error::ApiResult;
use crate::http::HttpTransport;
use crate::types::{AddressInput, Recipient, ServiceType, ShipmentConfirmation, ShipmentRequest};
use crate::wire::{self, RawSavedDocument};

const DATE_FORMAT: &str = "%d.%m.%Y";

impl<T: HttpTransport> NovaPoshtaClient<T> {
    /// Create a shipment dated tomorrow and return its tracking number.
    pub fn create_shipment(&self, request: &ShipmentRequest) -> ApiResult<ShipmentConfirmation> {
        let ship_date = Local::now().date_naive() + Duration::days(1);
        self.create_shipment_dated(request, ship_date)
    }

    pub(crate) fn create_shipment_dated(
        &self,
        request: &ShipmentRequest,
        ship_date: NaiveDate,
    ) -> ApiResult<ShipmentConfirmation> {
        let mut props = base_properties(request, ship_date);

        match request.service_type {
            ServiceType::WarehouseWarehouse => apply_warehouse_delivery(&mut props, request),
            ServiceType::WarehouseDoors => self.apply_door_delivery(&mut props, request)?,
        }

        if !request.paid {
            apply_payment_on_delivery(&mut props, request);
        }

        let rows = self.execute("InternetDocument", "save", Value::Object(props))?;
        let saved: RawSavedDocument = wire::decode_first(rows)?;
        let confirmation = ShipmentConfirmation::from(saved);
        tracing::info!(
            order = %request.order_id,
            tracking_number = %confirmation.tracking_number,
            "shipment created"
        );
        Ok(confirmation)
    }

    fn apply_door_delivery(
        &self,
        props: &mut Map<String, Value>,
        request: &ShipmentRequest,
    ) -> ApiResult<()> {
        let recipient = Recipient {
            first_name: request.recipient_name.clone(),
            middle_name: request.recipient_patronymic.clone(),
            last_name: request.recipient_surname.clone(),
            phone: request.recipient_phone.clone(),
        };
        let counterparty =
            self.add_counterparty_recipient(&request.recipient_city.ref_id, &recipient)?;

        let address = AddressInput {
            street_ref: Some(request.recipient_address.street_ref.clone()),
            find_by_string: None,
            building_number: request.recipient_address.building_number.clone(),
            flat: request.recipient_address.flat.clone(),
        };
        let address = self.add_counterparty_address(&counterparty.ref_id, &address)?;

        props.insert("CityRecipient".into(), json!(request.recipient_city.ref_id));
        props.insert("Recipient".into(), json!(counterparty.ref_id));
        props.insert("RecipientAddress".into(), json!(address.ref_id));
        props.insert("RecipientAddressName".into(), json!(address.description));
        props.insert("ContactRecipient".into(), json!(counterparty.contact_person_ref));
        Ok(())
    }
}

fn edrpou(request: &ShipmentRequest) -> Option<&str> {
    request.edrpou.as_deref().filter(|code| !code.is_empty())
}

/// Money amounts are sent as whole hryvnias, truncated toward zero.
fn whole_amount(price: f64) -> i64 {
    price.trunc() as i64
}

fn base_properties(request: &ShipmentRequest, ship_date: NaiveDate) -> Map<String, Value> {
    let weight: f64 = request.details.iter().map(|d| d.weight).sum();
    let recipient_name = [
        request.recipient_surname.as_str(),
        request.recipient_name.as_str(),
        request.recipient_patronymic.as_str(),
    ]
    .join(" ");

    let mut props = Map::new();
    props.insert("NewAddress".into(), json!("1"));
    props.insert("PayerType".into(), json!("Recipient"));
    props.insert("PaymentMethod".into(), json!("Cash"));
    props.insert("CargoType".into(), json!("Parcel"));
    props.insert("SeatsAmount".into(), json!(request.details.len()));
    props.insert("Weight".into(), json!(weight));
    props.insert("ServiceType".into(), json!(request.service_type.as_str()));
    props.insert(
        "Description".into(),
        json!(format!("{}. №{}", request.description, request.order_id)),
    );
    props.insert("InfoRegClientBarcodes".into(), json!(request.order_id));
    props.insert(
        "DateTime".into(),
        json!(ship_date.format(DATE_FORMAT).to_string()),
    );
    props.insert("CitySender".into(), json!(request.city_sender));
    props.insert("Sender".into(), json!(request.sender_ref));
    props.insert("SenderAddress".into(), json!(request.warehouse_ref));
    props.insert("ContactSender".into(), json!(request.contact_ref));
    props.insert("SendersPhone".into(), json!(request.sender_phone));
    props.insert("RecipientType".into(), json!("PrivatePerson"));
    props.insert("RecipientName".into(), json!(recipient_name));
    props.insert("RecipientsPhone".into(), json!(request.recipient_phone));

    if let Some(code) = edrpou(request) {
        props.insert("EDRPOU".into(), json!(code));
    }
    props
}

fn apply_warehouse_delivery(props: &mut Map<String, Value>, request: &ShipmentRequest) {
    let city = &request.recipient_city;
    props.insert("RecipientCityName".into(), json!(city.name));
    props.insert("RecipientArea".into(), json!(city.area));
    props.insert("RecipientAreaRegions".into(), json!(city.region));
    props.insert(
        "RecipientAddressName".into(),
        json!(request.recipient_address.address_name),
    );
}

// Organisations (EDRPOU present) pay through "afterpayment on goods"; private
// buyers get a cash-on-delivery backward delivery line.
fn apply_payment_on_delivery(props: &mut Map<String, Value>, request: &ShipmentRequest) {
    let amount = whole_amount(request.total_price);
    if edrpou(request).is_some() {
        props.insert("AfterpaymentOnGoodsCost".into(), json!(amount));
    } else {
        props.insert(
            "BackwardDeliveryData".into(),
            json!([{
                "PayerType": "Recipient",
                "CargoType": "Money",
                "RedeliveryString": amount,
            }]),
        );
    }
}
