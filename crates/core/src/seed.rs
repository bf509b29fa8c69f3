use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{LeaderboardEntry, PlayerId};

const SEED_ROWS: &[(&str, &str, u8, u32, u32, u32)] = &[
    // (player id, name, score, seconds used, hour, minute) on 2024-01-15
    ("player_001", "อัจฉรา นักคิด", 98, 105, 14, 30),
    ("player_002", "สมชาย เก่งเลข", 95, 132, 15, 15),
    ("player_003", "มาลี คิดเร็ว", 92, 150, 16, 0),
    ("player_004", "กิตติ แม่นยำ", 90, 168, 16, 45),
    ("player_005", "วิทยา คิดดี", 87, 195, 17, 30),
    ("player_006", "สุดา มั่นใจ", 85, 210, 18, 0),
    ("player_007", "ธนวัฒน์ รวดเร็ว", 83, 180, 18, 30),
    ("player_008", "นิรมล ใจเย็น", 80, 240, 19, 0),
    ("player_009", "ประเสริฐ ลองดู", 78, 270, 19, 30),
    ("player_010", "เกศวรา พยายาม", 75, 300, 20, 0),
];

fn seed_timestamp(hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|day| day.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// Fixed illustrative rows that are always merged into the leaderboard.
///
/// These are never persisted and come back unranked.
#[must_use]
pub fn seed_leaderboard() -> Vec<LeaderboardEntry> {
    SEED_ROWS
        .iter()
        .map(|&(id, name, score, secs, hour, minute)| {
            LeaderboardEntry::new(
                PlayerId::new(id),
                name,
                score,
                secs,
                seed_timestamp(hour, minute),
            )
        })
        .collect()
}
