pub mod chart;
pub mod error;
pub mod launch_date;
pub mod mission;
