//! Console session orchestration

pub mod session;

pub use session::{Batch, Session, Tab, MESSAGE_TAB_ID, MESSAGE_TAB_LABEL};
