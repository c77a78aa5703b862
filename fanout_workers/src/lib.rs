pub mod periodic_tasks;
pub mod removal;
pub mod workers;
