#![allow(dead_code)]

pub mod scripted_service;
pub mod stub_backend;

use chrono::{DateTime, TimeZone, Utc};

use flowshelf::session::SessionContext;
use flowshelf::types::{CatalogEntry, Difficulty, Identity};

pub use scripted_service::ScriptedService;
pub use stub_backend::StubBackend;

pub const ADMIN_EMAIL: &str = "owner@example.com";

pub const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn png(len: usize) -> Vec<u8> {
    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(len.max(PNG_HEADER.len()), 0);
    bytes
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
}

pub fn entry(id: &str, title: &str, category: &str, added: DateTime<Utc>) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        brief_description: format!("{title} summary"),
        full_description: format!("{title} in detail"),
        image_url: Some(format!("https://cdn.example.com/{id}.png")),
        workflow_json: None,
        tags: vec!["automation".to_string()],
        tools_used: vec!["n8n".to_string()],
        category: category.to_string(),
        difficulty: Difficulty::Beginner,
        use_case: None,
        date_added: added,
        views: 0,
        author_id: "admin-1".to_string(),
    }
}

pub fn admin_context() -> SessionContext {
    SessionContext {
        identity: Some(Identity {
            id: "admin-1".to_string(),
            email: Some(ADMIN_EMAIL.to_string()),
        }),
        elevated: true,
    }
}
