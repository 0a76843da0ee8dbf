// Hotel deduplication: records that share a name and coarse location are the
// same physical hotel, whatever id the provider gave them.

use std::collections::HashMap;

use crate::hotel::HotelRecord;
use crate::scoring::completeness_score;

// Coordinates are bucketed to 3 decimal places (~100m)
const KEY_COORDINATE_SCALE: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub name: String,
    pub latitude: i64,
    pub longitude: i64,
}

impl LocationKey {
    pub fn for_record(record: &HotelRecord) -> Self {
        Self {
            name: record.name.trim().to_lowercase(),
            latitude: quantize(record.latitude),
            longitude: quantize(record.longitude),
        }
    }
}

fn quantize(coordinate: f64) -> i64 {
    (coordinate * KEY_COORDINATE_SCALE).round() as i64
}

// Collapse duplicates, keeping the richer record and patching its gaps from
// the other. Output follows first-seen order of each key.
pub fn dedupe(records: Vec<HotelRecord>) -> Vec<HotelRecord> {
    let mut order: Vec<LocationKey> = Vec::new();
    let mut merged: HashMap<LocationKey, HotelRecord> = HashMap::new();

    for record in records {
        let key = LocationKey::for_record(&record);

        match merged.remove(&key) {
            Some(stored) => {
                // Ties keep the stored (first-seen) record as winner
                let merged_record = if completeness_score(&record) > completeness_score(&stored) {
                    merge_records(record, &stored)
                } else {
                    merge_records(stored, &record)
                };
                merged.insert(key, merged_record);
            }
            None => {
                order.push(key.clone());
                merged.insert(key, record);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

// Start from the winner and fill every absent or zero field from the loser
pub fn merge_records(winner: HotelRecord, loser: &HotelRecord) -> HotelRecord {
    let mut merged = winner;

    fill_text(&mut merged.id, &loser.id);
    fill_text(&mut merged.name, &loser.name);
    fill_number(&mut merged.latitude, loser.latitude);
    fill_number(&mut merged.longitude, loser.longitude);
    fill_option(&mut merged.address, &loser.address);
    fill_option(&mut merged.city, &loser.city);
    fill_option(&mut merged.country, &loser.country);
    fill_optional_number(&mut merged.rating, loser.rating);
    fill_optional_number(&mut merged.star_rating, loser.star_rating);
    fill_option(&mut merged.description, &loser.description);
    fill_option(&mut merged.thumbnail, &loser.thumbnail);
    if merged.images.is_empty() {
        merged.images = loser.images.clone();
    }

    merged
}

fn fill_text(target: &mut String, source: &str) {
    if target.is_empty() {
        *target = source.to_string();
    }
}

fn fill_number(target: &mut f64, source: f64) {
    if *target == 0.0 {
        *target = source;
    }
}

fn fill_option(target: &mut Option<String>, source: &Option<String>) {
    if target.is_none() {
        *target = source.clone();
    }
}

fn fill_optional_number(target: &mut Option<f64>, source: Option<f64>) {
    if target.map_or(true, |value| value == 0.0) && source.is_some() {
        *target = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: &str, name: &str, latitude: f64, longitude: f64) -> HotelRecord {
        HotelRecord::new(id, name, latitude, longitude)
    }

    #[test]
    fn test_merges_duplicates_with_gap_filling() {
        let first = HotelRecord {
            rating: Some(4.0),
            thumbnail: Some("x.jpg".to_string()),
            ..hotel("a", "Grand Hotel", 51.5000, -0.1000)
        };
        let second = HotelRecord {
            rating: Some(0.0),
            description: Some("A lovely place to stay indeed".to_string()),
            ..hotel("b", "grand hotel ", 51.5001, -0.1002)
        };

        let result = dedupe(vec![first, second]);

        assert_eq!(result.len(), 1);
        let merged = &result[0];
        assert_eq!(merged.rating, Some(4.0));
        assert_eq!(merged.thumbnail.as_deref(), Some("x.jpg"));
        assert_eq!(
            merged.description.as_deref(),
            Some("A lovely place to stay indeed")
        );
    }

    #[test]
    fn test_higher_score_wins() {
        let sparse = hotel("a", "Old Dungeon Ghyll", 54.446, -3.092);
        let rich = HotelRecord {
            address: Some("Great Langdale".to_string()),
            star_rating: Some(3.0),
            ..hotel("b", "Old Dungeon Ghyll", 54.446, -3.092)
        };

        let result = dedupe(vec![sparse, rich]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "b");
        assert_eq!(result[0].address.as_deref(), Some("Great Langdale"));
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let first = HotelRecord {
            address: Some("Main Street".to_string()),
            ..hotel("first", "Clachaig Inn", 56.66, -5.05)
        };
        let second = HotelRecord {
            rating: Some(4.5),
            ..hotel("second", "Clachaig Inn", 56.66, -5.05)
        };

        let result = dedupe(vec![first, second]);

        assert_eq!(result[0].id, "first");
        assert_eq!(result[0].address.as_deref(), Some("Main Street"));
        // Gap filled from the loser
        assert_eq!(result[0].rating, Some(4.5));
    }

    #[test]
    fn test_winner_fields_are_kept() {
        let winner = HotelRecord {
            rating: Some(4.0),
            city: Some("Fort William".to_string()),
            ..hotel("w", "Ben Nevis Hotel", 56.82, -5.1)
        };
        let loser = HotelRecord {
            rating: Some(2.0),
            city: Some("Inverness".to_string()),
            country: Some("UK".to_string()),
            ..hotel("l", "Ben Nevis Hotel", 56.82, -5.1)
        };

        let merged = merge_records(winner, &loser);

        assert_eq!(merged.id, "w");
        assert_eq!(merged.rating, Some(4.0));
        assert_eq!(merged.city.as_deref(), Some("Fort William"));
        assert_eq!(merged.country.as_deref(), Some("UK"));
    }

    #[test]
    fn test_images_filled_only_when_winner_has_none() {
        let loser = HotelRecord {
            images: vec!["loser.jpg".to_string()],
            ..hotel("l", "Inn", 1.0, 1.0)
        };

        let empty = merge_records(hotel("w", "Inn", 1.0, 1.0), &loser);
        assert_eq!(empty.images, vec!["loser.jpg".to_string()]);

        let own = HotelRecord {
            images: vec!["winner.jpg".to_string()],
            ..hotel("w", "Inn", 1.0, 1.0)
        };
        let kept = merge_records(own, &loser);
        assert_eq!(kept.images, vec!["winner.jpg".to_string()]);
    }

    #[test]
    fn test_distinct_hotels_keep_first_seen_order() {
        let records = vec![
            hotel("1", "Alpha", 50.0, -1.0),
            hotel("2", "Bravo", 50.0, -1.0),
            hotel("3", "alpha", 50.0001, -1.0001),
            hotel("4", "Charlie", 50.1, -1.0),
            hotel("5", "Alpha", 50.2, -1.0),
        ];

        let names: Vec<String> = dedupe(records).into_iter().map(|h| h.id).collect();
        assert_eq!(names, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let records = vec![
            HotelRecord {
                thumbnail: Some("a.jpg".to_string()),
                ..hotel("1", "Wasdale Head Inn", 54.466, -3.266)
            },
            HotelRecord {
                description: Some("Birthplace of British climbing".to_string()),
                ..hotel("2", " WASDALE HEAD INN", 54.4661, -3.2662)
            },
            hotel("3", "Pen-y-Gwryd", 53.08, -4.0),
            hotel("4", "", 53.0, -4.0),
            hotel("5", "", 53.0, -4.0),
        ];

        let once = dedupe(records);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_empty_names_collide() {
        let result = dedupe(vec![hotel("1", "", 52.0, -1.0), hotel("2", "  ", 52.0, -1.0)]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_location_key_normalization() {
        let a = LocationKey::for_record(&hotel("a", "  The Sun Inn ", 54.00012, -2.99988));
        let b = LocationKey::for_record(&hotel("b", "the sun inn", 54.0, -3.0));
        assert_eq!(a, b);
        assert_eq!(a.latitude, 54_000);
        assert_eq!(a.longitude, -3_000);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }

    #[test]
    fn test_huge_star_rating_from_provider_does_not_overflow() {
        let json = r#"[
            { "id": "a", "name": "Sty Head Inn", "latitude": 54.48, "longitude": -3.2,
              "thumbnail": "t.jpg", "starRating": 5e12, "rating": 4 },
            { "id": "b", "name": "Sty Head Inn", "latitude": 54.48, "longitude": -3.2,
              "address": "Borrowdale", "starRating": 5e12, "rating": 3 }
        ]"#;
        let payload: crate::hotel::ProviderPayload = serde_json::from_str(json).unwrap();

        let result = dedupe(payload.into_records());

        assert_eq!(result.len(), 1);
        // Both saturate, so the tie keeps the first record and fills its gaps
        assert_eq!(result[0].id, "a");
        assert_eq!(result[0].address.as_deref(), Some("Borrowdale"));
    }

    // Rounding cells are fixed, so near neighbours either side of a cell
    // boundary keep separate keys
    #[test]
    fn test_pair_straddling_rounding_cell_stays_split() {
        let a = hotel("a", "Grand Hotel", 51.5004, -0.1);
        let b = hotel("b", "Grand Hotel", 51.5006, -0.1);
        assert!((a.latitude - b.latitude).abs() < 0.0005);

        assert_ne!(LocationKey::for_record(&a), LocationKey::for_record(&b));
        assert_eq!(dedupe(vec![a, b]).len(), 2);
    }
}
