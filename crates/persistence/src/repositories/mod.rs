//! Repository implementations for database operations.

pub mod invitation;
pub mod personal_list;
pub mod space;
pub mod user;
pub mod video_extraction;

pub use invitation::InvitationRepository;
pub use personal_list::PersonalListRepository;
pub use space::SpaceRepository;
pub use user::UserRepository;
pub use video_extraction::VideoExtractionRepository;
