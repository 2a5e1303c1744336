pub mod catalog;
pub mod collection;
pub mod economy;
pub mod engine;
pub mod odds;
pub mod pull;
pub mod session;
pub mod shop;
pub mod tiers;
