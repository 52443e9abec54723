pub mod plan_controller;
pub mod plan_repository;

pub use plan_controller::{LoadOutcome, PlanController, PlanState};
pub use plan_repository::PlanRepository;
