//! Contract deployment

pub mod deployer;

pub use deployer::{apply_gas_margin, DeployError, Deployer, Deployment, GAS_MARGIN_PERCENT};
