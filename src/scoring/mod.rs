pub mod bedroom;
pub mod calendar;
pub mod composite;
pub mod debt;
pub mod sleep_goal;
pub mod trend;
