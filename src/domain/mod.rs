// Error taxonomy
pub mod errors;

// Market data domain
pub mod market;

// Port interfaces
pub mod ports;

// Setup / alert domain
pub mod trading;
