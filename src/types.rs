//! Core types for housepix

use serde::{Deserialize, Serialize};

/// One decoded house listing
///
/// Immutable once decoded; the paginated fetcher owns records until they
/// are handed to the image pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Listing identifier, unique within a fetch
    pub id: u64,
    /// Street address of the property
    pub address: String,
    /// Name of the current owner
    pub homeowner: String,
    /// Asking price in whole currency units
    pub price: u64,
    /// URL of the listing photo
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// Decoded envelope of one listing page
///
/// Transient: consumed immediately after decode. A page with `ok == false`
/// contributes no records, even if `houses` is non-empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HousesResponse {
    /// Records carried by this page, in server order
    pub houses: Vec<House>,
    /// Server-side success flag for the page
    pub ok: bool,
}

/// Unit of work for the image pipeline, derived 1:1 from a [`House`]
///
/// Owned by whichever download worker dequeues it; dropped after the
/// persist step completes, successfully or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTask {
    /// Identifier of the originating listing
    pub id: u64,
    /// Sanitized address, used as the file-name stem
    pub stem: String,
    /// Source URL of the photo
    pub url: String,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_decodes_wire_field_names() {
        let json = r#"{
            "id": 1,
            "address": "123 Main St",
            "homeowner": "John Doe",
            "price": 100000,
            "photoURL": "http://example.com/photo.jpg"
        }"#;
        let house: House = serde_json::from_str(json).unwrap();
        assert_eq!(house.id, 1);
        assert_eq!(house.address, "123 Main St");
        assert_eq!(house.photo_url, "http://example.com/photo.jpg");
    }

    #[test]
    fn envelope_decodes_ok_flag() {
        let json = r#"{"houses": [], "ok": false}"#;
        let response: HousesResponse = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.houses.is_empty());
    }
}
