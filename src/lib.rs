pub mod chart;
pub mod export;
pub mod fpl_fetch;
pub mod http_client;
pub mod layout;
pub mod narrate;
pub mod squad;
pub mod state;
