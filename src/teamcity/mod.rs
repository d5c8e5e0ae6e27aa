pub mod client;

pub use client::BuildCountQuery;
pub use client::BuildStatus;
pub use client::TeamCityClient;
