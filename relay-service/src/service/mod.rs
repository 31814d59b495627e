pub mod invoice;
pub mod meta;
pub mod metrics;
pub mod storage;
pub mod whatsapp;
