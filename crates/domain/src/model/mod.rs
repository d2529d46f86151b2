//! Entity records of the project cost-sharing application.

mod bill;
mod bill_position;
mod project;
mod project_settings;

pub use bill::Bill;
pub use bill_position::BillPosition;
pub use project::Project;
pub use project_settings::ProjectSettings;
