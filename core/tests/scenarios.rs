//! Multi-call behavior driven through a scripted transport: the shipment
//! pipeline, label downloads and repeated deletes.

mod common;

use common::{client, ScriptedTransport};
use novaposhta_core::{
    ApiError, HttpResponse, Language, ParcelDetail, RecipientAddress, RecipientCity, ServiceType,
    ShipmentRequest, TransportError,
};
use serde_json::json;

fn shipment(service_type: ServiceType) -> ShipmentRequest {
    let recipient_address = match service_type {
        ServiceType::WarehouseWarehouse => RecipientAddress::warehouse("Відділення №1"),
        ServiceType::WarehouseDoors => RecipientAddress::doors("street-ref", "22", "5"),
    };
    ShipmentRequest {
        order_id: "1042".into(),
        description: "Книги".into(),
        details: vec![ParcelDetail {
            weight: 1.5,
            volume: None,
        }],
        service_type,
        paid: true,
        total_price: 250.9,
        edrpou: None,
        city_sender: "city-sender".into(),
        sender_ref: "sender".into(),
        warehouse_ref: "sender-warehouse".into(),
        contact_ref: "sender-contact".into(),
        sender_phone: "380671112233".into(),
        recipient_name: "Іван".into(),
        recipient_patronymic: "Іванович".into(),
        recipient_surname: "Петренко".into(),
        recipient_phone: "380501234567".into(),
        recipient_city: RecipientCity {
            ref_id: "city-ref".into(),
            name: "Київ".into(),
            area: "Київська".into(),
            region: "".into(),
        },
        recipient_address,
    }
}

fn saved_document() -> serde_json::Value {
    json!({"success": true, "data": [{
        "Ref": "doc-ref",
        "IntDocNumber": "20450000000001",
        "CostOnSite": 65,
        "EstimatedDeliveryDate": "11.03.2024"
    }], "errors": []})
}

fn created_counterparty() -> serde_json::Value {
    json!({"success": true, "data": [{
        "Ref": "cp-ref",
        "ContactPerson": {"success": true, "data": [{"Ref": "contact-ref"}], "errors": []}
    }]})
}

fn created_address() -> serde_json::Value {
    json!({"success": true, "data": [{"Ref": "addr-ref", "Description": "вул. Хрещатик 22 кв. 5"}]})
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[test]
fn city_lookup_projects_ua_description() {
    let transport = ScriptedTransport::new()
        .reply_json(json!({"success": true, "data": [{"Ref": "r1", "DescriptionUA": "Київ"}]}));
    let c = client(&transport);

    let cities = c.get_cities("Kyiv");
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].ref_id, "r1");
    assert_eq!(cities[0].city_name, "Київ");
    assert_eq!(transport.calls(), vec![("Address".to_string(), "getCities".to_string())]);
    assert_eq!(transport.props(0)["FindByString"], "Kyiv");
}

#[test]
fn lookups_return_empty_on_transport_failure() {
    let transport = ScriptedTransport::new()
        .reply(Err(TransportError::new("timed out")))
        .reply(Ok(HttpResponse::new(503, "Service Unavailable")))
        .reply_json(json!({"success": false, "errors": ["Limit exceeded"]}))
        .reply_json(json!({"success": true, "data": []}));
    let c = client(&transport);

    assert!(c.get_cities("Київ").is_empty());
    assert!(c.search_settlements("Київ").is_empty());
    assert!(c.get_streets("city", "Хрещ").is_empty());
    assert!(c.get_warehouses("city", None).is_empty());
}

#[test]
fn lookups_preserve_provider_order() {
    let transport = ScriptedTransport::new().reply_json(json!({"success": true, "data": [
        {"Ref": "w3", "Number": "3", "Description": "Відділення №3"},
        {"Ref": "w1", "Number": "1", "Description": "Відділення №1"},
        {"Ref": "w2", "Number": "2", "Description": "Відділення №2"}
    ]}));
    let c = client(&transport);

    let numbers: Vec<String> = c
        .get_warehouses("city", Some("Відділення"))
        .into_iter()
        .map(|w| w.number)
        .collect();
    assert_eq!(numbers, vec!["3", "1", "2"]);
}

#[test]
fn language_switch_applies_at_mapping_time() {
    let row = json!({"success": true, "data": [{"Ref": "r1", "Description": "Київ", "DescriptionRu": "Киев"}]});
    let transport = ScriptedTransport::new().reply_json(row.clone()).reply_json(row);
    let mut c = client(&transport);

    assert_eq!(c.get_cities("Ки")[0].city_name, "Київ");
    c.set_language(Language::Ru);
    assert_eq!(c.get_cities("Ки")[0].city_name, "Киев");
    // the request itself does not change with the language
    assert_eq!(transport.props(0), transport.props(1));
}

// ---------------------------------------------------------------------------
// Shipment pipeline
// ---------------------------------------------------------------------------

#[test]
fn door_delivery_stops_when_recipient_is_rejected() {
    let transport = ScriptedTransport::new()
        .reply_json(json!({"success": false, "data": [], "errors": ["bad phone"]}))
        .reply_json(created_address())
        .reply_json(saved_document());
    let c = client(&transport);

    let err = c.create_shipment(&shipment(ServiceType::WarehouseDoors)).unwrap_err();
    assert_eq!(err, ApiError::Rejected(vec!["bad phone".to_string()]));
    assert_eq!(err.errors(), vec!["bad phone"]);
    assert_eq!(
        transport.calls(),
        vec![("Counterparty".to_string(), "save".to_string())]
    );
}

#[test]
fn door_delivery_stops_when_address_is_rejected() {
    let transport = ScriptedTransport::new()
        .reply_json(created_counterparty())
        .reply_json(json!({"success": false, "errors": ["StreetRef is invalid"]}))
        .reply_json(saved_document());
    let c = client(&transport);

    let err = c.create_shipment(&shipment(ServiceType::WarehouseDoors)).unwrap_err();
    assert_eq!(err.errors(), vec!["StreetRef is invalid"]);
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn door_delivery_chains_refs_into_document() {
    let transport = ScriptedTransport::new()
        .reply_json(created_counterparty())
        .reply_json(created_address())
        .reply_json(saved_document());
    let c = client(&transport);

    let confirmation = c.create_shipment(&shipment(ServiceType::WarehouseDoors)).unwrap();
    assert_eq!(confirmation.tracking_number, "20450000000001");
    assert_eq!(confirmation.document_ref, "doc-ref");
    assert_eq!(confirmation.estimated_cost, Some(65.0));

    assert_eq!(
        transport.calls(),
        vec![
            ("Counterparty".to_string(), "save".to_string()),
            ("Address".to_string(), "save".to_string()),
            ("InternetDocument".to_string(), "save".to_string()),
        ]
    );

    let recipient = transport.props(0);
    assert_eq!(recipient["CityRef"], "city-ref");
    assert_eq!(recipient["LastName"], "Петренко");

    let address = transport.props(1);
    assert_eq!(address["CounterpartyRef"], "cp-ref");
    assert_eq!(address["StreetRef"], "street-ref");
    assert_eq!(address["BuildingNumber"], "22");
    assert_eq!(address["Flat"], "5");

    let document = transport.props(2);
    assert_eq!(document["CityRecipient"], "city-ref");
    assert_eq!(document["Recipient"], "cp-ref");
    assert_eq!(document["RecipientAddress"], "addr-ref");
    assert_eq!(document["RecipientAddressName"], "вул. Хрещатик 22 кв. 5");
    assert_eq!(document["ContactRecipient"], "contact-ref");
    assert_eq!(document["ServiceType"], "WarehouseDoors");
}

#[test]
fn save_without_cost_still_returns_the_document() {
    let transport = ScriptedTransport::new().reply_json(json!({"success": true, "data": [{
        "Ref": "doc-ref",
        "IntDocNumber": "20450000000001"
    }], "errors": []}));
    let c = client(&transport);

    let confirmation = c.create_shipment(&shipment(ServiceType::WarehouseWarehouse)).unwrap();
    assert_eq!(confirmation.tracking_number, "20450000000001");
    assert_eq!(confirmation.document_ref, "doc-ref");
    assert_eq!(confirmation.estimated_cost, None);
}

#[test]
fn warehouse_delivery_makes_a_single_call() {
    let transport = ScriptedTransport::new().reply_json(saved_document());
    let c = client(&transport);

    c.create_shipment(&shipment(ServiceType::WarehouseWarehouse)).unwrap();
    assert_eq!(
        transport.calls(),
        vec![("InternetDocument".to_string(), "save".to_string())]
    );
    let document = transport.props(0);
    assert_eq!(document["RecipientCityName"], "Київ");
    assert_eq!(document["RecipientAddressName"], "Відділення №1");
    assert!(document.get("BackwardDeliveryData").is_none());
}

#[test]
fn unpaid_order_attaches_truncated_cash_on_delivery() {
    let transport = ScriptedTransport::new().reply_json(saved_document());
    let c = client(&transport);

    let mut request = shipment(ServiceType::WarehouseWarehouse);
    request.paid = false;
    c.create_shipment(&request).unwrap();

    let document = transport.props(0);
    let lines = document["BackwardDeliveryData"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["RedeliveryString"], 250);
    assert_eq!(lines[0]["CargoType"], "Money");
    assert!(document.get("AfterpaymentOnGoodsCost").is_none());
}

#[test]
fn unpaid_organisation_order_uses_afterpayment() {
    let transport = ScriptedTransport::new().reply_json(saved_document());
    let c = client(&transport);

    let mut request = shipment(ServiceType::WarehouseWarehouse);
    request.paid = false;
    request.edrpou = Some("12345678".into());
    c.create_shipment(&request).unwrap();

    let document = transport.props(0);
    assert_eq!(document["EDRPOU"], "12345678");
    assert_eq!(document["AfterpaymentOnGoodsCost"], 250);
    assert!(document.get("BackwardDeliveryData").is_none());
}

#[test]
fn unpaid_door_delivery_also_gets_payment_terms() {
    let transport = ScriptedTransport::new()
        .reply_json(created_counterparty())
        .reply_json(created_address())
        .reply_json(saved_document());
    let c = client(&transport);

    let mut request = shipment(ServiceType::WarehouseDoors);
    request.paid = false;
    c.create_shipment(&request).unwrap();

    assert_eq!(transport.props(2)["BackwardDeliveryData"][0]["RedeliveryString"], 250);
}

#[test]
fn failed_save_is_returned_unchanged() {
    let transport = ScriptedTransport::new()
        .reply_json(json!({"success": false, "errors": ["Weight is invalid", "SeatsAmount is invalid"]}));
    let c = client(&transport);

    let err = c.create_shipment(&shipment(ServiceType::WarehouseWarehouse)).unwrap_err();
    assert_eq!(err.errors(), vec!["Weight is invalid", "SeatsAmount is invalid"]);
}

#[test]
fn ship_date_is_tomorrow() {
    let transport = ScriptedTransport::new().reply_json(saved_document());
    let c = client(&transport);

    c.create_shipment(&shipment(ServiceType::WarehouseWarehouse)).unwrap();
    let tomorrow = chrono::Local::now().date_naive() + chrono::Duration::days(1);
    assert_eq!(
        transport.props(0)["DateTime"],
        tomorrow.format("%d.%m.%Y").to_string()
    );
}

// ---------------------------------------------------------------------------
// Mutations and labels
// ---------------------------------------------------------------------------

#[test]
fn deleting_twice_surfaces_the_second_rejection() {
    let transport = ScriptedTransport::new()
        .reply_json(json!({"success": true, "data": [{"Ref": "doc-ref"}]}))
        .reply_json(json!({"success": false, "data": [], "errors": ["Document not found"]}));
    let c = client(&transport);
    let refs = vec!["doc-ref".to_string()];

    assert!(c.delete_internet_document(&refs).is_ok());
    let err = c.delete_internet_document(&refs).unwrap_err();
    assert_eq!(err.errors(), vec!["Document not found"]);
}

#[test]
fn marking_returns_exact_bytes_on_200() {
    let pdf = b"%PDF-1.4\n\x00\x01binary".to_vec();
    let transport = ScriptedTransport::new().reply(Ok(HttpResponse::new(200, pdf.clone())));
    let c = client(&transport);

    let numbers = vec!["20450000000001".to_string(), "20450000000002".to_string()];
    assert_eq!(c.get_marking_zebra(&numbers), Some(pdf));
    let requests = transport.requests();
    assert!(requests[0]
        .url
        .ends_with("/orders/20450000000001,20450000000002/type/pdf/zebra/zebra/apiKey/test-key"));
}

#[test]
fn marking_returns_none_on_failure() {
    let transport = ScriptedTransport::new()
        .reply(Ok(HttpResponse::new(404, "not found")))
        .reply(Err(TransportError::new("connection reset")));
    let c = client(&transport);
    let numbers = vec!["1".to_string()];

    assert_eq!(c.get_marking_zebra(&numbers), None);
    assert_eq!(c.get_marking_zebra(&numbers), None);
}
