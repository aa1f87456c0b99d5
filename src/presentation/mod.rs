//! HTML presentation: head metadata, view models and askama templates.

pub mod head;
pub mod views;
