use crate::books::factory::create_book_repository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;

pub fn create_catalog_service(config: &Configuration) -> Box<dyn CatalogService> {
    Box::new(CatalogServiceImpl::new(config, create_book_repository()))
}
