pub mod fund;
pub mod link;
pub mod rule;
pub mod user;

pub use fund::{AnnotatedFundRecord, FundRecord};
pub use link::FundLink;
pub use rule::MonitorRule;
pub use user::CurrentUser;
