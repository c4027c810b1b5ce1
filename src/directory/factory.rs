use crate::core::domain::Configuration;
use crate::directory::domain::DirectoryService;
use crate::directory::domain::service::DirectoryServiceImpl;
use crate::members::factory::create_member_repository;

pub fn create_directory_service(config: &Configuration) -> Box<dyn DirectoryService> {
    Box::new(DirectoryServiceImpl::new(config, create_member_repository()))
}
