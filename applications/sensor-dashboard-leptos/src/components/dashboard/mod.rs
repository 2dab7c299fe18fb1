mod dashboard;
mod history_table;
mod readings_card;
mod unit_consumption_card;

pub use dashboard::Dashboard;
