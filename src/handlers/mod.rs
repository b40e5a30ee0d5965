pub mod croupiers;
pub mod evenements;
pub mod postulations;
pub mod registrations;
pub mod system_events;
pub mod uploads;
