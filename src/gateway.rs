pub mod events;
pub mod factory;
pub mod logs;
pub mod memory;

// GatewayPublisherVia selects where circulation notifications are delivered
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GatewayPublisherVia {
    Logs,
    Memory,
}
