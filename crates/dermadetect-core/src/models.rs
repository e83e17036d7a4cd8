pub mod case;
pub mod diagnosis;
pub mod enrichment;
pub mod patient;
pub mod risk;
pub mod sync;
pub mod user;
pub mod vitals;
