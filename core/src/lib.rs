//! Synchronous client for the Nova Poshta delivery API.
//!
//! # Overview
//! Every remote operation is a JSON envelope posted to one endpoint. The
//! client builds that envelope, hands it to an injected [`HttpTransport`], and
//! normalizes the provider's `{success, data, errors}` answer into an
//! [`ApiResult`]. Search lookups map rows into typed projections; mutations
//! return the result untouched; `create_shipment` chains counterparty,
//! address and document calls.
//!
//! # Design
//! - `NovaPoshtaClient` holds configuration and a transport, nothing else.
//! - Request building and envelope parsing are pure (`build_request`,
//!   `parse_envelope`), so the I/O boundary stays explicit.
//! - Provider record shapes are confined to the private `wire` module.
//! - `UreqTransport` (feature `ureq`, on by default) is a ready-made blocking
//!   transport; any other HTTP stack plugs in through the trait.
//!
//! ```no_run
//! use novaposhta_core::{ClientConfig, NovaPoshtaClient, UreqTransport};
//!
//! let client = NovaPoshtaClient::new(UreqTransport::new(), ClientConfig::from_env());
//! for city in client.get_cities("Київ") {
//!     println!("{} {}", city.ref_id, city.city_name);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod operations;
mod shipment;
pub mod types;
mod wire;

pub use client::NovaPoshtaClient;
pub use config::{ClientConfig, Endpoints, Language};
pub use error::{ApiError, ApiResult, TransportError, UNKNOWN_ERROR};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use types::{
    AddressInput, City, CreatedAddress, CreatedCounterparty, ParcelDetail, Recipient,
    RecipientAddress, RecipientCity, ServiceType, Settlement, ShipmentConfirmation,
    ShipmentRequest, Street, TrackingStatus, Warehouse,
};
