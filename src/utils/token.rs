use chrono::{DateTime, Utc};
use rand::{thread_rng, Rng};

// No 0/O or 1/I so folios can be dictated over the phone
const TRACKING_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_code(length: usize) -> String {
    let mut rng = thread_rng();
    (0..length)
        .map(|_| TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())] as char)
        .collect()
}

/// Human-readable folio for a contact request, e.g. `SOL-20261016-K7QX3M`.
pub fn generate_tracking_id(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", prefix, at.format("%Y%m%d"), generate_code(6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tracking_id_has_prefix_date_and_code() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let id = generate_tracking_id("SOL", at);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "SOL");
        assert_eq!(parts[1], "20261016");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].bytes().all(|b| TRACKING_ALPHABET.contains(&b)));
    }
}
