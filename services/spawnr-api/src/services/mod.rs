pub mod client_resolver;
pub mod cluster_catalog;
pub mod connection_registry;
pub mod descriptor_store;
pub mod identity_exchange;
pub mod resource_service;
