use std::sync::Arc;
use crate::catalog::factory::create_catalog_service;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::CirculationServiceImpl;
use crate::circulation::engine::CirculationEngine;
use crate::core::domain::Configuration;
use crate::directory::factory::create_directory_service;
use crate::gateway::factory::create_publisher;
use crate::gateway::GatewayPublisherVia;
use crate::loans::factory::create_loan_repository;
use crate::reservations::factory::create_reservation_repository;
use crate::utils::date::SystemClock;

pub fn create_circulation_service(config: &Configuration) -> Box<dyn CirculationService> {
    Box::new(CirculationServiceImpl::new(
        config,
        create_catalog_service(config),
        create_directory_service(config),
        create_loan_repository(),
        create_reservation_repository()))
}

pub fn create_circulation_engine(config: &Configuration, via: GatewayPublisherVia) -> CirculationEngine {
    CirculationEngine::new(config, Arc::new(SystemClock), create_publisher(via))
}
