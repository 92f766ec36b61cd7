//! Default collection used when no valid persisted state exists.

use crate::model::participant::ParticipantRecord;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;

/// Returns the two illustrative sign-ups shown on a fresh install.
///
/// Ids are 1 and 2, so the first real registration receives id 3.
pub fn seed_records() -> Vec<ParticipantRecord> {
    vec![
        ParticipantRecord {
            id: 1,
            name: "نورة أحمد".to_string(),
            phone: "0500000001".to_string(),
            wants_drawing: true,
            drawing_completed: false,
            created_at: seed_timestamp(2025, 1, 15, 10, 0),
            info_completed: true,
            hair_color: Some("أسود".to_string()),
            eye_color: Some("بني".to_string()),
            favorite_color: Some("#2c3e50".to_string()),
            skin_tone: Some("قمحي".to_string()),
            hair_style: Some("طويل ومستقيم".to_string()),
            clothing: Some("عباية سوداء".to_string()),
            additional_notes: Some("أحب الألوان الدافئة".to_string()),
            drawing_path: None,
            extra: Map::new(),
        },
        ParticipantRecord {
            id: 2,
            name: "فاطمة محمد".to_string(),
            phone: "0500000002".to_string(),
            wants_drawing: true,
            drawing_completed: true,
            created_at: seed_timestamp(2025, 1, 16, 11, 30),
            info_completed: true,
            hair_color: Some("بني".to_string()),
            eye_color: Some("أخضر".to_string()),
            favorite_color: Some("#d4af37".to_string()),
            skin_tone: Some("فاتح".to_string()),
            hair_style: Some("قصير ومموج".to_string()),
            clothing: Some("جينس وبلوزة".to_string()),
            additional_notes: Some("الرسمة كانت رائعة!".to_string()),
            drawing_path: Some(
                "https://via.placeholder.com/400x300/FF6B6B/FFFFFF?text=رسمة+فاطمة".to_string(),
            ),
            extra: Map::new(),
        },
    ]
}

fn seed_timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    // Fixed, valid calendar values: `single()` always resolves for UTC.
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
