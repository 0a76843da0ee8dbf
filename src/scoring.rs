use crate::hotel::HotelRecord;

const MIN_DESCRIPTION_CHARS: usize = 20;

// How filled-in a record is. Only meaningful when comparing two candidates
// for the same physical hotel.
pub fn completeness_score(record: &HotelRecord) -> u32 {
    let mut score: u32 = 0;

    if record
        .description
        .as_ref()
        .map_or(false, |d| d.chars().count() > MIN_DESCRIPTION_CHARS)
    {
        score = score.saturating_add(2);
    }

    if record.thumbnail.as_ref().map_or(false, |t| !t.is_empty()) {
        score = score.saturating_add(2);
    }

    if !record.images.is_empty() {
        score = score.saturating_add(1);
    }

    // Stars contribute their own value, rounded to whole stars; the total saturates
    if let Some(stars) = record.star_rating.filter(|s| *s > 0.0) {
        score = score.saturating_add(stars.round() as u32);
    }

    if record.rating.map_or(false, |r| r > 0.0) {
        score = score.saturating_add(1);
    }

    if record.address.as_ref().map_or(false, |a| !a.is_empty()) {
        score = score.saturating_add(1);
    }

    score
}
