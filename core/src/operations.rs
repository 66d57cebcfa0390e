//! One method per remote operation.
//!
//! Search-style lookups (`get_cities`, `search_settlements`, `get_streets`,
//! `get_warehouses`) return an empty list when the call fails, since a search
//! box treats "no matches" and "request failed" alike. Everything else hands
//! the `ApiResult` back so failures stay visible.

use serde_json::{json, Value};

use crate::client::NovaPoshtaClient;
use crate::error::ApiResult;
use crate::http::HttpTransport;
use crate::types::{
    AddressInput, City, CreatedAddress, CreatedCounterparty, Recipient, Settlement, Street,
    TrackingStatus, Warehouse,
};
use crate::wire::{
    self, RawAddress, RawCity, RawCounterparty, RawSettlementSearch, RawStreet, RawTrackingStatus,
    RawWarehouse,
};

impl<T: HttpTransport> NovaPoshtaClient<T> {
    // -----------------------------------------------------------------------
    // Address lookups
    // -----------------------------------------------------------------------

    pub fn get_cities(&self, find: &str) -> Vec<City> {
        let props = json!({
            "FindByString": find,
            "Limit": self.limit(),
            "Page": 1,
        });
        let language = self.language();
        self.lookup("getCities", props, |rows| {
            wire::decode_rows::<RawCity>(rows)?
                .into_iter()
                .map(|raw| raw.into_city(language))
                .collect()
        })
    }

    /// Settlement search. Matches come back nested under `data[0].Addresses`.
    pub fn search_settlements(&self, name: &str) -> Vec<Settlement> {
        let props = json!({
            "CityName": name,
            "Limit": self.limit(),
            "Page": 1,
        });
        self.lookup("searchSettlements", props, |rows| {
            let search: RawSettlementSearch = wire::decode_first(rows)?;
            Ok(search.addresses.into_iter().map(Settlement::from).collect())
        })
    }

    pub fn get_streets(&self, city_ref: &str, find: &str) -> Vec<Street> {
        let props = json!({
            "CityRef": city_ref,
            "FindByString": find,
            "Limit": self.limit(),
            "Page": 1,
        });
        self.lookup("getStreet", props, |rows| {
            Ok(wire::decode_rows::<RawStreet>(rows)?
                .into_iter()
                .map(Street::from)
                .collect())
        })
    }

    /// Warehouses in a city, optionally filtered by number or address text.
    pub fn get_warehouses(&self, city_ref: &str, find: Option<&str>) -> Vec<Warehouse> {
        let props = json!({
            "CityRef": city_ref,
            "FindByString": find,
            "Limit": self.limit(),
            "Page": 1,
        });
        let language = self.language();
        self.lookup("getWarehouses", props, |rows| {
            wire::decode_rows::<RawWarehouse>(rows)?
                .into_iter()
                .map(|raw| raw.into_warehouse(language))
                .collect()
        })
    }

    fn lookup<R>(
        &self,
        called_method: &str,
        props: Value,
        project: impl FnOnce(Vec<Value>) -> ApiResult<Vec<R>>,
    ) -> Vec<R> {
        match self.execute("Address", called_method, props).and_then(project) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(method = called_method, error = %e, "lookup returned no results");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Counterparties and their addresses
    // -----------------------------------------------------------------------

    /// Register a private-person recipient in the given city.
    pub fn add_counterparty_recipient(
        &self,
        city_ref: &str,
        recipient: &Recipient,
    ) -> ApiResult<CreatedCounterparty> {
        let rows = self.execute(
            "Counterparty",
            "save",
            json!({
                "CityRef": city_ref,
                "FirstName": recipient.first_name,
                "MiddleName": recipient.middle_name,
                "LastName": recipient.last_name,
                "Phone": recipient.phone,
                "Email": "",
                "CounterpartyType": "PrivatePerson",
                "CounterpartyProperty": "Recipient",
            }),
        )?;
        let raw: RawCounterparty = wire::decode_first(rows)?;
        CreatedCounterparty::try_from(raw)
    }

    pub fn delete_counterparty(&self, counterparty_ref: &str) -> ApiResult<Vec<Value>> {
        self.execute("Counterparty", "delete", json!({ "Ref": counterparty_ref }))
    }

    pub fn add_counterparty_address(
        &self,
        counterparty_ref: &str,
        address: &AddressInput,
    ) -> ApiResult<CreatedAddress> {
        let rows = self.execute(
            "Address",
            "save",
            json!({
                "CounterpartyRef": counterparty_ref,
                "FindByString": address.find_by_string,
                "StreetRef": address.street_ref,
                "BuildingNumber": address.building_number,
                "Flat": address.flat,
            }),
        )?;
        let raw: RawAddress = wire::decode_first(rows)?;
        Ok(CreatedAddress::from(raw))
    }

    pub fn delete_counterparty_address(&self, address_ref: &str) -> ApiResult<Vec<Value>> {
        self.execute("Address", "delete", json!({ "Ref": address_ref }))
    }

    pub fn get_counterparty_contact_persons(&self, counterparty_ref: &str) -> ApiResult<Vec<Value>> {
        self.execute(
            "Counterparty",
            "getCounterpartyContactPersons",
            json!({ "Ref": counterparty_ref }),
        )
    }

    pub fn get_counterparty_sender(&self) -> ApiResult<Vec<Value>> {
        self.execute(
            "Counterparty",
            "getCounterparties",
            json!({ "CounterpartyProperty": "Sender" }),
        )
    }

    // -----------------------------------------------------------------------
    // Internet Documents and tracking
    // -----------------------------------------------------------------------

    /// Delete documents by ref. Deleting an already deleted document is a
    /// provider rejection, returned as `Err`.
    pub fn delete_internet_document(&self, document_refs: &[String]) -> ApiResult<Vec<Value>> {
        self.execute(
            "InternetDocument",
            "delete",
            json!({ "DocumentRefs": document_refs }),
        )
    }

    /// Documents created between two dates (`DD.MM.YYYY`).
    pub fn get_document_list(
        &self,
        date_time_from: &str,
        date_time_to: &str,
        redelivery_money: bool,
        unassembled_cargo: bool,
    ) -> ApiResult<Vec<Value>> {
        self.execute(
            "InternetDocument",
            "getDocumentList",
            json!({
                "DateTimeFrom": date_time_from,
                "DateTimeTo": date_time_to,
                "RedeliveryMoney": redelivery_money,
                "UnassembledCargo": unassembled_cargo,
                "GetFullList": 1,
            }),
        )
    }

    /// Tracking status per document number. `phone` (sender or recipient)
    /// unlocks the detailed fields; pass an empty string to skip it.
    pub fn get_status(
        &self,
        document_numbers: &[String],
        phone: &str,
    ) -> ApiResult<Vec<TrackingStatus>> {
        let documents: Vec<Value> = document_numbers
            .iter()
            .map(|number| json!({ "DocumentNumber": number, "Phone": phone }))
            .collect();
        let rows = self.execute(
            "TrackingDocument",
            "getStatusDocuments",
            json!({ "Documents": documents }),
        )?;
        Ok(wire::decode_rows::<RawTrackingStatus>(rows)?
            .into_iter()
            .map(TrackingStatus::from)
            .collect())
    }

    pub fn get_pack_list_special(&self) -> ApiResult<Vec<Value>> {
        self.execute(
            "Common",
            "getPackListSpecial",
            json!({
                "Length": 10,
                "Width": 10,
                "Height": 190,
                "PackForSale": 1,
            }),
        )
    }

    // -----------------------------------------------------------------------
    // Registries (scan sheets)
    // -----------------------------------------------------------------------

    pub fn get_registry(&self) -> ApiResult<Vec<Value>> {
        self.execute("ScanSheet", "getScanSheetList", json!({}))
    }

    /// Add documents to a registry, or to a new one when `registry_ref` is
    /// `None` (sent as an explicit `null`).
    pub fn add_registry(
        &self,
        document_refs: &[String],
        registry_ref: Option<&str>,
    ) -> ApiResult<Vec<Value>> {
        self.execute(
            "ScanSheet",
            "insertDocuments",
            json!({
                "DocumentRefs": document_refs,
                "Ref": registry_ref,
            }),
        )
    }

    pub fn delete_registry(&self, document_refs: &[String], registry_ref: &str) -> ApiResult<Vec<Value>> {
        self.execute(
            "ScanSheet",
            "removeDocuments",
            json!({
                "DocumentRefs": document_refs,
                "Ref": registry_ref,
            }),
        )
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    /// Download the zebra label PDF. `None` on any transport error or non-200
    /// status; there is no retry.
    pub fn get_marking_zebra(&self, tracking_numbers: &[String]) -> Option<Vec<u8>> {
        let request = self.build_marking_request(tracking_numbers);
        match self.transport().send(&request) {
            Ok(response) => {
                let status = response.status;
                let pdf = self.parse_marking(response);
                if pdf.is_none() {
                    tracing::warn!(status, documents = tracking_numbers.len(), "label download failed");
                }
                pdf
            }
            Err(e) => {
                tracing::warn!(error = %e, documents = tracking_numbers.len(), "label download failed");
                None
            }
        }
    }
}
