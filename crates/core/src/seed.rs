//! Default categories and mock announcements
//!
//! Used to seed an empty store and as the client's offline fallback.

use crate::model::{Announcement, Category};
use chrono::{DateTime, TimeZone, Utc};

/// The default category set, ordered by id
pub const DEFAULT_CATEGORIES: [(i64, &str); 9] = [
    (1, "City"),
    (2, "Health"),
    (3, "Community events"),
    (4, "Crime & Safety"),
    (5, "Culture"),
    (6, "Discounts & Benefits"),
    (7, "Emergencies"),
    (8, "For Seniors"),
    (9, "Kids & Family"),
];

// (id, category ids, year, month, day, hour, minute)
const MOCK_ANNOUNCEMENTS: [(i64, &[i64], i32, u32, u32, u32, u32); 20] = [
    (1, &[1], 2023, 8, 11, 4, 38),
    (2, &[1], 2023, 8, 11, 4, 36),
    (3, &[1], 2023, 8, 11, 4, 35),
    (4, &[1], 2023, 4, 19, 5, 14),
    (5, &[1], 2023, 4, 19, 5, 11),
    (6, &[1], 2023, 4, 19, 5, 11),
    (7, &[1, 2], 2023, 3, 24, 7, 27),
    (8, &[1, 2], 2023, 3, 24, 7, 26),
    (9, &[1, 2], 2023, 3, 24, 7, 26),
    (10, &[1, 2], 2023, 3, 24, 7, 26),
    (11, &[2], 2024, 2, 11, 8, 12),
    (12, &[3], 2024, 2, 18, 6, 40),
    (13, &[1], 2024, 3, 3, 11, 28),
    (14, &[2], 2024, 3, 8, 9, 0),
    (15, &[3], 2024, 4, 1, 12, 16),
    (16, &[1], 2024, 4, 13, 10, 53),
    (17, &[2], 2024, 5, 7, 14, 22),
    (18, &[3], 2024, 5, 24, 7, 5),
    (19, &[1], 2024, 6, 9, 16, 11),
    (20, &[2], 2024, 6, 26, 18, 35),
];

/// Categories and announcements that ship with a fresh install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub announcements: Vec<Announcement>,
}

/// The default categories
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(id, name)| Category::new(*id, *name))
        .collect()
}

/// The default dataset: 9 categories and 20 mock announcements
pub fn default_dataset() -> Dataset {
    let categories = default_categories();

    let announcements = MOCK_ANNOUNCEMENTS
        .iter()
        .filter_map(|&(id, category_ids, year, month, day, hour, minute)| {
            let published = utc(year, month, day, hour, minute)?;
            Some(Announcement {
                id,
                title: format!("Title {}", id),
                description: format!("Mock description {}", id),
                publication_date: published,
                last_update: published,
                categories: categories
                    .iter()
                    .filter(|c| category_ids.contains(&c.id))
                    .cloned()
                    .collect(),
            })
        })
        .collect();

    Dataset {
        categories,
        announcements,
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}
