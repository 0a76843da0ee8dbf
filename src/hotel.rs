use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::geo::GeoPoint;

// A hotel as seen in one provider response. Records are never mutated after
// they leave the provider adapter; merging builds a new value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<f64>,
    pub star_rating: Option<f64>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
}

impl HotelRecord {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            ..Default::default()
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

// Provider ids arrive as either strings or numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawHotelId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RawHotelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawHotelId::Text(id) => write!(f, "{}", id),
            RawHotelId::Number(id) => write!(f, "{}", id),
        }
    }
}

// Data structures for the provider JSON response. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawHotel {
    pub id: Option<RawHotelId>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<f64>,
    #[serde(alias = "star_rating")]
    pub star_rating: Option<f64>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Option<Vec<Option<String>>>,
}

impl RawHotel {
    // Returns None when the record has no usable coordinates
    pub fn into_record(self) -> Option<HotelRecord> {
        let latitude = self.latitude.filter(|lat| lat.is_finite())?;
        let longitude = self.longitude.filter(|lng| lng.is_finite())?;

        Some(HotelRecord {
            id: self.id.map(|id| id.to_string()).unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            latitude,
            longitude,
            address: non_blank(self.address),
            city: non_blank(self.city),
            country: non_blank(self.country),
            rating: self.rating.filter(|r| r.is_finite()),
            star_rating: self.star_rating.filter(|s| s.is_finite()),
            description: non_blank(self.description),
            thumbnail: non_blank(self.thumbnail),
            images: self
                .images
                .unwrap_or_default()
                .into_iter()
                .filter_map(non_blank)
                .collect(),
        })
    }
}

// The provider either returns a bare list or wraps it in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProviderPayload {
    List(Vec<RawHotel>),
    Wrapped { hotels: Vec<RawHotel> },
}

impl ProviderPayload {
    pub fn into_records(self) -> Vec<HotelRecord> {
        let raw = match self {
            ProviderPayload::List(hotels) => hotels,
            ProviderPayload::Wrapped { hotels } => hotels,
        };

        let total = raw.len();
        let records: Vec<HotelRecord> = raw.into_iter().filter_map(RawHotel::into_record).collect();
        if records.len() < total {
            debug!(
                "Dropped {} of {} provider records without usable coordinates",
                total - records.len(),
                total
            );
        }
        records
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
