//! Built-in dataset served while the backend is unreachable.

use std::collections::BTreeMap;

use happyart_api_types::{Article, Course};
use time::macros::datetime;

pub fn fallback_courses() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            title: "Rainbow Drawing Fun".into(),
            description: "Learn to draw beautiful rainbows with simple steps!".into(),
            age_group: "2-4".into(),
            image_emoji: "🌈".into(),
            image_url: None,
            duration: "15 mins".into(),
            lessons: 5,
            difficulty: "Beginner".into(),
            is_published: true,
            created_at: datetime!(2024-01-15 10:00:00 UTC),
            updated_at: None,
        },
        Course {
            id: 2,
            title: "Animal Friends".into(),
            description: "Draw cute animals step by step with fun techniques!".into(),
            age_group: "5-8".into(),
            image_emoji: "🐱".into(),
            image_url: None,
            duration: "20 mins".into(),
            lessons: 8,
            difficulty: "Easy".into(),
            is_published: true,
            created_at: datetime!(2024-01-14 10:00:00 UTC),
            updated_at: None,
        },
        Course {
            id: 3,
            title: "Space Art Adventure".into(),
            description: "Create amazing space-themed artwork!".into(),
            age_group: "9-12".into(),
            image_emoji: "🚀".into(),
            image_url: None,
            duration: "30 mins".into(),
            lessons: 12,
            difficulty: "Intermediate".into(),
            is_published: false,
            created_at: datetime!(2024-01-13 10:00:00 UTC),
            updated_at: None,
        },
    ]
}

pub fn fallback_articles() -> Vec<Article> {
    vec![
        Article {
            id: 1,
            title: "5 Fun Color Mixing Tips".into(),
            excerpt: "Discover amazing color combinations that will make your art pop!".into(),
            content: "Here are some amazing tips for mixing colors...".into(),
            category: "tips".into(),
            image_emoji: "🎨".into(),
            image_url: None,
            read_time: "3 min read".into(),
            is_published: true,
            created_at: datetime!(2024-01-15 10:00:00 UTC),
            updated_at: None,
        },
        Article {
            id: 2,
            title: "Drawing Your Pet".into(),
            excerpt: "Step-by-step guide to drawing your furry friends!".into(),
            content: "Follow these steps to draw your beloved pet...".into(),
            category: "tutorials".into(),
            image_emoji: "🐕".into(),
            image_url: None,
            read_time: "5 min read".into(),
            is_published: true,
            created_at: datetime!(2024-01-14 10:00:00 UTC),
            updated_at: None,
        },
        Article {
            id: 3,
            title: "Art Inspiration from Nature".into(),
            excerpt: "Find inspiration in the world around you!".into(),
            content: "Nature provides endless inspiration for young artists...".into(),
            category: "inspiration".into(),
            image_emoji: "🍃".into(),
            image_url: None,
            read_time: "4 min read".into(),
            is_published: false,
            created_at: datetime!(2024-01-13 10:00:00 UTC),
            updated_at: None,
        },
    ]
}

pub fn fallback_settings() -> BTreeMap<String, String> {
    [
        ("site_name", "Happy Art Town"),
        (
            "site_description",
            "Where creativity comes alive! Join thousands of young artists learning to draw, paint, and create amazing art!",
        ),
        ("contact_email", "admin@happyarttown.com"),
        ("max_courses_per_user", "10"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}
