//! Library entrypoint for fundwatch.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

pub mod config;
pub mod error;
pub mod models;

// Kept at crate root because the codebase references it as `crate::auth`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

pub mod controllers;
pub mod routes;

use services::cache::TtlCache;
use services::fund_source::{DirectoryEntry, FundSourceClient};
use services::gateway::GatewayClient;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub fund_source: FundSourceClient,
    pub gateway: GatewayClient,
    pub directory_cache: TtlCache<Vec<DirectoryEntry>>,
}

impl AppState {
    pub fn new(db: mongodb::Database, settings: config::Settings) -> Self {
        let fund_source = FundSourceClient::new(
            settings.fund_directory_url.clone(),
            settings.fund_nav_base_url.clone(),
        );
        let gateway = GatewayClient::new(&settings);

        Self {
            db,
            settings,
            fund_source,
            gateway,
            directory_cache: TtlCache::new(),
        }
    }
}
