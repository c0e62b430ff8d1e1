//! Subscription records: domain types, storage contract, storage and façade.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{NewSubscription, PeriodFilter, Subscription};
pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
