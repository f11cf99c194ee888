//! Delivery channels for campaign events.

pub mod webhook;
