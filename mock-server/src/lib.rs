//! In-memory stand-in for the Nova Poshta API.
//!
//! Serves the JSON endpoint (`POST /v2.0/json/`) and the zebra label endpoint
//! with the same envelope conventions as the real provider: every JSON answer
//! is HTTP 200 with `{success, data, errors}`, and failures are reported via
//! `success: false`. Reference data comes from `fixtures`; counterparties,
//! addresses, documents and registries live in memory per app instance.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-key";

const LABEL_PATH: &str =
    "/orders/printMarking100x100/orders/{numbers}/type/pdf/zebra/zebra/apiKey/{key}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub api_key: String,
    pub model_name: String,
    pub called_method: String,
    #[serde(default)]
    pub method_properties: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Vec<Value>,
    pub errors: Vec<String>,
}

impl ApiResponse {
    fn ok(data: Vec<Value>) -> Self {
        Self {
            success: true,
            data,
            errors: Vec::new(),
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            errors: vec![error.into()],
        }
    }
}

#[derive(Debug, Clone)]
struct Counterparty {
    contact: Value,
}

#[derive(Debug, Clone)]
struct Document {
    ref_id: String,
    number: String,
    cost: f64,
    date: String,
    recipient_address: String,
}

#[derive(Debug, Default)]
struct Store {
    counterparties: HashMap<String, Counterparty>,
    addresses: HashMap<String, Value>,
    documents: HashMap<String, Document>,
    registries: HashMap<String, Vec<String>>,
    next_number: u64,
}

pub struct Mock {
    api_key: String,
    store: RwLock<Store>,
}

pub type Db = Arc<Mock>;

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let db: Db = Arc::new(Mock {
        api_key: api_key.to_string(),
        store: RwLock::new(Store::default()),
    });
    Router::new()
        .route("/v2.0/json/", post(dispatch))
        .route(LABEL_PATH, get(print_marking))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

async fn dispatch(State(db): State<Db>, Json(req): Json<ApiRequest>) -> Json<ApiResponse> {
    if req.api_key != db.api_key {
        tracing::debug!(model = %req.model_name, method = %req.called_method, "rejected api key");
        return Json(ApiResponse::fail("API key is invalid"));
    }
    tracing::debug!(model = %req.model_name, method = %req.called_method, "handling call");

    let props = &req.method_properties;
    let response = match (req.model_name.as_str(), req.called_method.as_str()) {
        ("Address", "getCities") => get_cities(props),
        ("Address", "searchSettlements") => search_settlements(props),
        ("Address", "getStreet") => get_streets(props),
        ("Address", "getWarehouses") => get_warehouses(props),
        ("Address", "save") => save_address(&db, props).await,
        ("Address", "delete") => delete_address(&db, props).await,
        ("Counterparty", "save") => save_counterparty(&db, props).await,
        ("Counterparty", "delete") => delete_counterparty(&db, props).await,
        ("Counterparty", "getCounterparties") => get_counterparties(props),
        ("Counterparty", "getCounterpartyContactPersons") => contact_persons(&db, props).await,
        ("InternetDocument", "save") => save_document(&db, props).await,
        ("InternetDocument", "delete") => delete_documents(&db, props).await,
        ("InternetDocument", "getDocumentList") => document_list(&db).await,
        ("TrackingDocument", "getStatusDocuments") => tracking(&db, props).await,
        ("ScanSheet", "insertDocuments") => insert_into_registry(&db, props).await,
        ("ScanSheet", "removeDocuments") => remove_from_registry(&db, props).await,
        ("ScanSheet", "getScanSheetList") => registry_list(&db).await,
        ("Common", "getPackListSpecial") => ApiResponse::ok(fixtures::pack_list()),
        (model, method) => ApiResponse::fail(format!("Method {model}.{method} not found")),
    };
    Json(response)
}

fn str_prop<'a>(props: &'a Value, key: &str) -> &'a str {
    props.get(key).and_then(Value::as_str).unwrap_or("")
}

fn limit(props: &Value) -> usize {
    props
        .get("Limit")
        .and_then(Value::as_u64)
        .map_or(usize::MAX, |l| l as usize)
}

fn string_list(props: &Value, key: &str) -> Vec<String> {
    props
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn matches(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

fn get_cities(props: &Value) -> ApiResponse {
    let find = str_prop(props, "FindByString");
    let rows = fixtures::CITIES
        .iter()
        .filter(|c| matches(c.name_ua, find) || matches(c.name_ru, find))
        .take(limit(props))
        .map(fixtures::city_row)
        .collect();
    ApiResponse::ok(rows)
}

fn search_settlements(props: &Value) -> ApiResponse {
    let name = str_prop(props, "CityName");
    let addresses: Vec<Value> = fixtures::CITIES
        .iter()
        .filter(|c| matches(c.name_ua, name))
        .take(limit(props))
        .map(fixtures::settlement_row)
        .collect();
    ApiResponse::ok(vec![json!({
        "TotalCount": addresses.len(),
        "Addresses": addresses,
    })])
}

fn get_streets(props: &Value) -> ApiResponse {
    let city_ref = str_prop(props, "CityRef");
    let find = str_prop(props, "FindByString");
    let rows = fixtures::STREETS
        .iter()
        .filter(|s| s.city_ref == city_ref && matches(s.name, find))
        .take(limit(props))
        .map(fixtures::street_row)
        .collect();
    ApiResponse::ok(rows)
}

fn get_warehouses(props: &Value) -> ApiResponse {
    let city_ref = str_prop(props, "CityRef");
    let find = str_prop(props, "FindByString");
    let rows = fixtures::WAREHOUSES
        .iter()
        .filter(|w| w.city_ref == city_ref && (w.number == find || matches(w.name_ua, find)))
        .take(limit(props))
        .map(fixtures::warehouse_row)
        .collect();
    ApiResponse::ok(rows)
}

fn get_counterparties(props: &Value) -> ApiResponse {
    match str_prop(props, "CounterpartyProperty") {
        "Sender" => ApiResponse::ok(vec![fixtures::sender_row()]),
        _ => ApiResponse::ok(Vec::new()),
    }
}

// ---------------------------------------------------------------------------
// Counterparties and addresses
// ---------------------------------------------------------------------------

fn valid_phone(phone: &str) -> bool {
    phone.len() == 12 && phone.starts_with("380") && phone.chars().all(|c| c.is_ascii_digit())
}

async fn save_counterparty(db: &Db, props: &Value) -> ApiResponse {
    let city_ref = str_prop(props, "CityRef");
    if !fixtures::CITIES.iter().any(|c| c.ref_id == city_ref) {
        return ApiResponse::fail("CityRef is invalid");
    }
    let phone = str_prop(props, "Phone");
    if !valid_phone(phone) {
        return ApiResponse::fail("Phone is invalid");
    }
    let first = str_prop(props, "FirstName");
    let middle = str_prop(props, "MiddleName");
    let last = str_prop(props, "LastName");
    if first.is_empty() || last.is_empty() {
        return ApiResponse::fail("FirstName and LastName are required");
    }

    let ref_id = Uuid::new_v4().to_string();
    let contact = json!({
        "Ref": Uuid::new_v4().to_string(),
        "Description": format!("{last} {first} {middle}"),
        "FirstName": first,
        "MiddleName": middle,
        "LastName": last,
    });
    let row = json!({
        "Ref": ref_id,
        "Description": format!("{last} {first} {middle}"),
        "FirstName": first,
        "MiddleName": middle,
        "LastName": last,
        "CounterpartyType": "PrivatePerson",
        "ContactPerson": {
            "success": true,
            "data": [contact.clone()],
            "errors": [],
        },
    });
    db.store
        .write()
        .await
        .counterparties
        .insert(ref_id, Counterparty { contact });
    ApiResponse::ok(vec![row])
}

async fn delete_counterparty(db: &Db, props: &Value) -> ApiResponse {
    let ref_id = str_prop(props, "Ref");
    match db.store.write().await.counterparties.remove(ref_id) {
        Some(_) => ApiResponse::ok(vec![json!({ "Ref": ref_id })]),
        None => ApiResponse::fail("Counterparty not found"),
    }
}

async fn contact_persons(db: &Db, props: &Value) -> ApiResponse {
    let ref_id = str_prop(props, "Ref");
    if ref_id == fixtures::SENDER_REF {
        return ApiResponse::ok(vec![fixtures::sender_contact_row()]);
    }
    match db.store.read().await.counterparties.get(ref_id) {
        Some(counterparty) => ApiResponse::ok(vec![counterparty.contact.clone()]),
        None => ApiResponse::fail("Counterparty not found"),
    }
}

async fn save_address(db: &Db, props: &Value) -> ApiResponse {
    let counterparty_ref = str_prop(props, "CounterpartyRef");
    let mut store = db.store.write().await;
    if !store.counterparties.contains_key(counterparty_ref) {
        return ApiResponse::fail("CounterpartyRef is invalid");
    }
    let street_ref = str_prop(props, "StreetRef");
    let Some(street) = fixtures::STREETS.iter().find(|s| s.ref_id == street_ref) else {
        return ApiResponse::fail("StreetRef is invalid");
    };
    let building = str_prop(props, "BuildingNumber");
    if building.is_empty() {
        return ApiResponse::fail("BuildingNumber is required");
    }
    let flat = str_prop(props, "Flat");
    let description = if flat.is_empty() {
        format!("{} {} {}", street.kind, street.name, building)
    } else {
        format!("{} {} {} кв. {}", street.kind, street.name, building, flat)
    };

    let ref_id = Uuid::new_v4().to_string();
    let row = json!({ "Ref": ref_id, "Description": description });
    store.addresses.insert(ref_id, row.clone());
    ApiResponse::ok(vec![row])
}

async fn delete_address(db: &Db, props: &Value) -> ApiResponse {
    let ref_id = str_prop(props, "Ref");
    match db.store.write().await.addresses.remove(ref_id) {
        Some(_) => ApiResponse::ok(vec![json!({ "Ref": ref_id })]),
        None => ApiResponse::fail("Address not found"),
    }
}

// ---------------------------------------------------------------------------
// Internet Documents
// ---------------------------------------------------------------------------

/// Tariff: 50 UAH base, 10 UAH per kg, 2% of declared cash-on-delivery.
fn estimate_cost(props: &Value) -> f64 {
    let weight = props.get("Weight").and_then(Value::as_f64).unwrap_or(0.0);
    let redelivery = props
        .get("BackwardDeliveryData")
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("RedeliveryString"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    50.0 + weight * 10.0 + redelivery * 0.02
}

async fn save_document(db: &Db, props: &Value) -> ApiResponse {
    for key in ["Sender", "CitySender", "SenderAddress", "RecipientsPhone", "DateTime"] {
        if str_prop(props, key).is_empty() {
            return ApiResponse::fail(format!("{key} is required"));
        }
    }
    if !valid_phone(str_prop(props, "RecipientsPhone")) {
        return ApiResponse::fail("RecipientsPhone is invalid");
    }

    let mut store = db.store.write().await;
    match str_prop(props, "ServiceType") {
        "WarehouseWarehouse" => {
            if str_prop(props, "RecipientCityName").is_empty() {
                return ApiResponse::fail("RecipientCityName is required");
            }
        }
        "WarehouseDoors" => {
            if !store.counterparties.contains_key(str_prop(props, "Recipient")) {
                return ApiResponse::fail("Recipient is invalid");
            }
            if !store.addresses.contains_key(str_prop(props, "RecipientAddress")) {
                return ApiResponse::fail("RecipientAddress is invalid");
            }
        }
        other => return ApiResponse::fail(format!("ServiceType {other} is not supported")),
    }

    store.next_number += 1;
    let ref_id = Uuid::new_v4().to_string();
    let number = format!("2045{:010}", store.next_number);
    let cost = estimate_cost(props);
    let date = str_prop(props, "DateTime").to_string();
    let recipient_address = str_prop(props, "RecipientAddressName").to_string();
    let row = json!({
        "Ref": ref_id,
        "CostOnSite": cost,
        "EstimatedDeliveryDate": date,
        "IntDocNumber": number,
        "TypeDocument": "InternetDocument",
    });
    store.documents.insert(
        ref_id.clone(),
        Document {
            ref_id,
            number,
            cost,
            date,
            recipient_address,
        },
    );
    ApiResponse::ok(vec![row])
}

async fn delete_documents(db: &Db, props: &Value) -> ApiResponse {
    let refs = string_list(props, "DocumentRefs");
    if refs.is_empty() {
        return ApiResponse::fail("DocumentRefs is required");
    }
    let mut store = db.store.write().await;
    if let Some(missing) = refs.iter().find(|r| !store.documents.contains_key(*r)) {
        return ApiResponse::fail(format!("Document {missing} not found"));
    }
    let rows = refs
        .iter()
        .filter_map(|r| store.documents.remove(r))
        .map(|doc| json!({ "Ref": doc.ref_id }))
        .collect();
    for members in store.registries.values_mut() {
        members.retain(|r| !refs.contains(r));
    }
    ApiResponse::ok(rows)
}

async fn document_list(db: &Db) -> ApiResponse {
    let store = db.store.read().await;
    let rows = store
        .documents
        .values()
        .map(|doc| {
            json!({
                "Ref": doc.ref_id,
                "IntDocNumber": doc.number,
                "CostOnSite": doc.cost,
                "DateTime": doc.date,
            })
        })
        .collect();
    ApiResponse::ok(rows)
}

async fn tracking(db: &Db, props: &Value) -> ApiResponse {
    let store = db.store.read().await;
    let requested: Vec<&str> = props
        .get("Documents")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .filter_map(|d| d.get("DocumentNumber").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if requested.is_empty() {
        return ApiResponse::fail("Documents is required");
    }
    let rows = requested
        .into_iter()
        .map(|number| {
            match store.documents.values().find(|doc| doc.number == number) {
                Some(doc) => json!({
                    "Number": number,
                    "Status": "Відправник самостійно створив цю накладну, але ще не надав до відправки",
                    "StatusCode": "1",
                    "ScheduledDeliveryDate": doc.date,
                    "WarehouseRecipient": doc.recipient_address,
                }),
                None => json!({
                    "Number": number,
                    "Status": "Номер не знайдено",
                    "StatusCode": "3",
                }),
            }
        })
        .collect();
    ApiResponse::ok(rows)
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

async fn insert_into_registry(db: &Db, props: &Value) -> ApiResponse {
    let refs = string_list(props, "DocumentRefs");
    let mut store = db.store.write().await;
    if let Some(missing) = refs.iter().find(|r| !store.documents.contains_key(*r)) {
        return ApiResponse::fail(format!("Document {missing} not found"));
    }
    let registry_ref = match props.get("Ref").and_then(Value::as_str) {
        Some(existing) if store.registries.contains_key(existing) => existing.to_string(),
        Some(_) => return ApiResponse::fail("ScanSheet not found"),
        None => Uuid::new_v4().to_string(),
    };
    let members = store.registries.entry(registry_ref.clone()).or_default();
    for r in refs {
        if !members.contains(&r) {
            members.push(r);
        }
    }
    ApiResponse::ok(vec![json!({
        "Ref": registry_ref,
        "Number": format!("105-{:05}", members.len()),
        "Success": members.iter().map(|r| json!({ "Ref": r })).collect::<Vec<_>>(),
    })])
}

async fn remove_from_registry(db: &Db, props: &Value) -> ApiResponse {
    let refs = string_list(props, "DocumentRefs");
    let registry_ref = str_prop(props, "Ref");
    let mut store = db.store.write().await;
    let Some(members) = store.registries.get_mut(registry_ref) else {
        return ApiResponse::fail("ScanSheet not found");
    };
    members.retain(|r| !refs.contains(r));
    ApiResponse::ok(vec![json!({
        "Ref": registry_ref,
        "DocumentRefs": refs,
    })])
}

async fn registry_list(db: &Db) -> ApiResponse {
    let store = db.store.read().await;
    let rows = store
        .registries
        .iter()
        .map(|(ref_id, members)| json!({ "Ref": ref_id, "Count": members.len() }))
        .collect();
    ApiResponse::ok(rows)
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

async fn print_marking(
    State(db): State<Db>,
    Path((joined, key)): Path<(String, String)>,
) -> impl IntoResponse {
    if key != db.api_key {
        return Err(StatusCode::FORBIDDEN);
    }
    let numbers: Vec<&str> = joined.split(',').filter(|n| !n.is_empty()).collect();
    let store = db.store.read().await;
    let all_known = !numbers.is_empty()
        && numbers
            .iter()
            .all(|n| store.documents.values().any(|doc| doc.number == *n));
    if !all_known {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok((
        [(header::CONTENT_TYPE, "application/pdf")],
        fixtures::label_pdf(&numbers),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_request_reads_camel_case_envelope() {
        let req: ApiRequest = serde_json::from_str(
            r#"{"apiKey":"k","modelName":"Address","calledMethod":"getCities","methodProperties":{"FindByString":"Київ"}}"#,
        )
        .unwrap();
        assert_eq!(req.model_name, "Address");
        assert_eq!(req.method_properties["FindByString"], "Київ");
    }

    #[test]
    fn api_request_defaults_missing_properties() {
        let req: ApiRequest = serde_json::from_str(
            r#"{"apiKey":"k","modelName":"ScanSheet","calledMethod":"getScanSheetList"}"#,
        )
        .unwrap();
        assert!(req.method_properties.is_null());
    }

    #[test]
    fn failure_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::fail("nope")).unwrap();
        assert_eq!(json, json!({"success": false, "data": [], "errors": ["nope"]}));
    }

    #[test]
    fn phone_validation() {
        assert!(valid_phone("380501234567"));
        assert!(!valid_phone("0501234567"));
        assert!(!valid_phone("38050123456a"));
    }

    #[test]
    fn cost_includes_cash_on_delivery_fee() {
        let props = json!({"Weight": 2.0, "BackwardDeliveryData": [{"RedeliveryString": 100}]});
        assert_eq!(estimate_cost(&props), 72.0);
    }

    #[test]
    fn city_search_is_case_insensitive() {
        let response = get_cities(&json!({"FindByString": "київ"}));
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0]["Ref"], fixtures::KYIV_REF);
    }
}
