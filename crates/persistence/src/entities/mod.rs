//! Entity definitions (database row mappings).

pub mod invitation;
pub mod personal_list;
pub mod space;
pub mod user;
pub mod video_extraction;

pub use invitation::{InvitationEntity, PendingInvitationRow};
pub use personal_list::PersonalListEntity;
pub use space::SpaceEntity;
pub use user::UserEntity;
pub use video_extraction::VideoExtractionEntity;
