//! Inbound adapters that translate external requests into calls on the
//! driving ports while keeping framework details at the edge.

pub mod http;
