//! Admin pages

mod dashboard;
mod reports;
mod users;

pub use dashboard::AdminDashboard;
pub use reports::AdminReports;
pub use users::AdminUsers;
