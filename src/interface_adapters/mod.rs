// Interface adapters: HTTP surface, renderers, cache and outbound clients.

pub mod cache;
pub mod clients;
pub mod handlers;
pub mod protocol;
pub mod renderers;
pub mod routes;
pub mod state;
