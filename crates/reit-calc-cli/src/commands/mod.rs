pub mod calculate;
pub mod development;
pub mod market;
pub mod regulations;
