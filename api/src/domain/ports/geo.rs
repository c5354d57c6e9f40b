//! Geocoding port

use async_trait::async_trait;

use crate::domain::entities::{CityName, PostalCode};
use crate::domain::Deadline;
use crate::error::GeoError;

/// Maps a validated postal code to the city it belongs to
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Resolve `code` before `deadline`.
    ///
    /// Implementations classify every failure as [`GeoError::NotFound`] or
    /// [`GeoError::InternalFailure`]; transport details stay in the logs.
    async fn resolve(&self, code: &PostalCode, deadline: Deadline) -> Result<CityName, GeoError>;
}
