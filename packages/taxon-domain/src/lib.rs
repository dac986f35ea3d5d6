pub mod category;
pub mod pagination;
pub mod query;
pub mod time_serde;
pub mod timing;
pub mod tree;

pub use category::{ActorId, CategoryId, CategoryNode, ROOT_PARENT_ID, RecentReply};
