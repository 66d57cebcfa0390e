//! Seed reference data: a couple of cities with their streets and
//! warehouses, and the sender counterparty every account starts with.

use serde_json::{json, Value};

pub const KYIV_REF: &str = "8d5a980d-391c-11dd-90d9-001a92567626";
pub const LVIV_REF: &str = "db5c88f5-391c-11dd-90d9-001a92567626";
pub const KHRESHCHATYK_REF: &str = "c55c9056-4148-11dd-9198-001d60451983";
pub const SENDER_REF: &str = "6e9acced-d072-11e3-95eb-0050568046cd";
pub const SENDER_CONTACT_REF: &str = "6e9bc5b6-d072-11e3-95eb-0050568046cd";

pub struct City {
    pub ref_id: &'static str,
    pub settlement_ref: &'static str,
    pub name_ua: &'static str,
    pub name_ru: &'static str,
    pub area: &'static str,
    pub region: &'static str,
}

pub const CITIES: &[City] = &[
    City {
        ref_id: KYIV_REF,
        settlement_ref: "e718a680-4b33-11e4-ab6d-005056801329",
        name_ua: "Київ",
        name_ru: "Киев",
        area: "Київська",
        region: "",
    },
    City {
        ref_id: LVIV_REF,
        settlement_ref: "e71abb60-4b33-11e4-ab6d-005056801329",
        name_ua: "Львів",
        name_ru: "Львов",
        area: "Львівська",
        region: "",
    },
];

pub struct Street {
    pub ref_id: &'static str,
    pub city_ref: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
}

pub const STREETS: &[Street] = &[
    Street {
        ref_id: KHRESHCHATYK_REF,
        city_ref: KYIV_REF,
        name: "Хрещатик",
        kind: "вул.",
    },
    Street {
        ref_id: "d4450bdb-0a58-11de-b6f5-001d92f78697",
        city_ref: KYIV_REF,
        name: "Перемоги",
        kind: "просп.",
    },
    Street {
        ref_id: "5e8c9b5a-4148-11dd-9198-001d60451983",
        city_ref: LVIV_REF,
        name: "Городоцька",
        kind: "вул.",
    },
];

pub struct Warehouse {
    pub ref_id: &'static str,
    pub city_ref: &'static str,
    pub number: &'static str,
    pub name_ua: &'static str,
    pub name_ru: &'static str,
}

pub const WAREHOUSES: &[Warehouse] = &[
    Warehouse {
        ref_id: "1ec09d88-e1c2-11e3-8c4a-0050568002cf",
        city_ref: KYIV_REF,
        number: "1",
        name_ua: "Відділення №1: вул. Пирогівський шлях, 135",
        name_ru: "Отделение №1: ул. Пироговский путь, 135",
    },
    Warehouse {
        ref_id: "7b422fc5-e1b8-11e3-8c4a-0050568002cf",
        city_ref: KYIV_REF,
        number: "2",
        name_ua: "Відділення №2: вул. Богатирська, 11",
        name_ru: "Отделение №2: ул. Богатырская, 11",
    },
    Warehouse {
        ref_id: "16922806-e1c2-11e3-8c4a-0050568002cf",
        city_ref: LVIV_REF,
        number: "1",
        name_ua: "Відділення №1: вул. Городоцька, 359",
        name_ru: "Отделение №1: ул. Городоцкая, 359",
    },
];

pub fn city_row(city: &City) -> Value {
    json!({
        "Ref": city.ref_id,
        "Description": city.name_ua,
        "DescriptionRu": city.name_ru,
        "AreaDescription": format!("{} область", city.area),
        "AreaDescriptionRu": Value::Null,
        "SettlementTypeDescription": "місто",
    })
}

pub fn settlement_row(city: &City) -> Value {
    json!({
        "Present": format!("м. {}, {} обл.", city.name_ua, city.area),
        "Warehouses": WAREHOUSES.iter().filter(|w| w.city_ref == city.ref_id).count(),
        "MainDescription": city.name_ua,
        "Area": city.area,
        "Region": city.region,
        "SettlementTypeCode": "м.",
        "Ref": city.settlement_ref,
        "DeliveryCity": city.ref_id,
    })
}

pub fn street_row(street: &Street) -> Value {
    json!({
        "Ref": street.ref_id,
        "Description": street.name,
        "StreetsTypeRef": street.kind,
        "StreetsType": street.kind,
    })
}

pub fn warehouse_row(warehouse: &Warehouse) -> Value {
    json!({
        "Ref": warehouse.ref_id,
        "Number": warehouse.number,
        "Description": warehouse.name_ua,
        "DescriptionRu": warehouse.name_ru,
        "CityRef": warehouse.city_ref,
    })
}

pub fn sender_row() -> Value {
    json!({
        "Ref": SENDER_REF,
        "Description": "ФОП Коваленко Олена",
        "City": KYIV_REF,
        "CounterpartyType": "PrivatePerson",
    })
}

pub fn sender_contact_row() -> Value {
    json!({
        "Ref": SENDER_CONTACT_REF,
        "Description": "Коваленко Олена",
        "Phones": "380671112233",
    })
}

pub fn pack_list() -> Vec<Value> {
    vec![
        json!({"Ref": "e9e4e7e5-0b2f-11e7-80fa-005056887b8d", "Description": "Коробка для ламп 10x10x190", "Length": 100, "Width": 100, "Height": 1900}),
        json!({"Ref": "e9e4e7e6-0b2f-11e7-80fa-005056887b8d", "Description": "Тубус 10x10x190", "Length": 100, "Width": 100, "Height": 1900}),
    ]
}

/// Enough of a PDF header for clients to recognize the payload.
pub fn label_pdf(numbers: &[&str]) -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n".to_vec();
    for number in numbers {
        pdf.extend_from_slice(format!("% label {number}\n").as_bytes());
    }
    pdf.extend_from_slice(b"%%EOF\n");
    pdf
}
